mod service_hook;

pub use service_hook::AzureServiceHookPayload;
