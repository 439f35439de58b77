use crate::error::{RelayError, RelayResult};

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct GithubRepository {
    pub full_name: String,
}

impl GithubRepository {
    /// Splits `owner/name` on the first separator; the name keeps any later `/`.
    pub fn owner_and_name(&self) -> RelayResult<(&str, &str)> {
        match self.full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok((owner, name)),
            _ => Err(RelayError::malformed(format!(
                "repository.full_name '{}' is not owner/name",
                self.full_name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(full_name: &str) -> GithubRepository {
        GithubRepository {
            full_name: full_name.to_string(),
        }
    }

    #[test]
    fn splits_owner_and_name() {
        let repo = repository("acme/widgets");

        assert_eq!(repo.owner_and_name().unwrap(), ("acme", "widgets"));
    }

    #[test]
    fn splits_on_first_separator_only() {
        let repo = repository("acme/widgets/sub");

        assert_eq!(repo.owner_and_name().unwrap(), ("acme", "widgets/sub"));
    }

    #[test]
    fn rejects_names_without_both_parts() {
        for full_name in ["widgets", "", "/widgets", "acme/"] {
            let err = repository(full_name).owner_and_name().unwrap_err();
            assert_eq!(err.kind(), "malformed_payload", "{full_name}");
        }
    }
}
