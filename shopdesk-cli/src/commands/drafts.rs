//! `shopdesk drafts`: stored form drafts.

use anyhow::{Result, bail};
use shopdesk_lib::form::FieldValues;
use shopdesk_lib::prefs::PreferenceStore;

use crate::cli::DraftsCommand;

pub async fn run_drafts(command: DraftsCommand, store: PreferenceStore) -> Result<()> {
    match command {
        DraftsCommand::Show { key } => match store.try_get::<FieldValues>(&key).await? {
            Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
            None => bail!("no draft stored under `{key}`"),
        },
        DraftsCommand::Clear { key } => {
            store.try_remove(&key).await?;
            println!("draft `{key}` cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_lib::form::FieldValue;
    use shopdesk_lib::prefs::SqliteBackend;

    async fn sqlite_store() -> PreferenceStore {
        PreferenceStore::new(SqliteBackend::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_show_missing_draft_fails() {
        let store = sqlite_store().await;
        let show = DraftsCommand::Show {
            key: "categoryFormData".into(),
        };
        assert!(run_drafts(show, store).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_removes_only_that_draft() {
        let store = sqlite_store().await;
        let draft: FieldValues = [("name".to_string(), FieldValue::from("Shoes"))].into();
        store.set("categoryFormData", &draft).await;
        store.set("offerFormData", &draft).await;

        let show = DraftsCommand::Show {
            key: "categoryFormData".into(),
        };
        run_drafts(show, store.clone()).await.unwrap();

        let clear = DraftsCommand::Clear {
            key: "categoryFormData".into(),
        };
        run_drafts(clear, store.clone()).await.unwrap();

        assert_eq!(store.get::<FieldValues>("categoryFormData").await, None);
        assert_eq!(store.get::<FieldValues>("offerFormData").await, Some(draft));
    }
}
