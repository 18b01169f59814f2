use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use tracing::info;

use super::{ScreenOutcome, ScreenStore};
use crate::config::StoreConfig;

/// MongoDB-backed screening store. The driver's client is internally
/// pooled, so one instance serves every session's finalize concurrently.
pub struct MongoScreenStore {
    collection: Collection<Document>,
}

impl MongoScreenStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        info!("Connecting to document store");

        let client = Client::with_uri_str(&config.url)
            .await
            .context("Failed to connect to document store")?;

        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        Ok(Self { collection })
    }
}

#[async_trait]
impl ScreenStore for MongoScreenStore {
    async fn record(&self, outcome: &ScreenOutcome) -> Result<()> {
        let status = if outcome.completed {
            "completed"
        } else {
            "incomplete"
        };

        self.collection
            .update_one(
                doc! { "UID": outcome.candidate_uid.as_str() },
                doc! { "$set": {
                    "secondary_score": outcome.score,
                    "phone_screen_notes": outcome.notes.as_str(),
                    "phone_screen": status,
                } },
                None,
            )
            .await
            .context("Failed to write screening record")?;

        info!(
            "Screening record written for candidate {} (score={})",
            outcome.candidate_uid, outcome.score
        );

        Ok(())
    }
}
