// Typed operation shortcuts.
// One method per operation of the todo API.

use crate::error::Result;

use super::client::ApiClient;
use super::operations::{CreateItem, DeleteItem, Hello, ListItems, Login, UpdateItem};
use super::types::Item;

impl ApiClient {
    /// Exchange credentials for a token. Does not touch the credential store.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let payload = self
            .execute(&Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(payload.token)
    }

    /// Greeting for the current token, or for a stranger without one.
    pub async fn hello(&self) -> Result<String> {
        let payload = self.execute(&Hello {}).await?;
        Ok(payload.hello)
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let payload = self.execute(&ListItems {}).await?;
        Ok(payload.items)
    }

    pub async fn create_item(&self, text: &str) -> Result<Item> {
        let payload = self
            .execute(&CreateItem {
                text: text.to_string(),
            })
            .await?;
        Ok(payload.item)
    }

    pub async fn update_item(&self, id: i64, text: &str) -> Result<Item> {
        let payload = self
            .execute(&UpdateItem {
                id,
                text: text.to_string(),
            })
            .await?;
        Ok(payload.item)
    }

    /// Delete an item. The server reports unknown ids as an error.
    pub async fn delete_item(&self, id: i64) -> Result<bool> {
        let payload = self.execute(&DeleteItem { id }).await?;
        Ok(payload.ok)
    }
}
