// crates/conformance-store-mongo/src/store.rs
// ============================================================================
// Module: Mongo Record Store
// Description: Point reads of records by collection and ObjectId.
// Purpose: Back the harness reconciler with the service's database.
// Dependencies: conformance-core, mongodb, async-trait
// ============================================================================

//! ## Overview
//! The connection string and database name are injected by the caller.
//! Connection problems surface on the first read as
//! [`StoreError::Unavailable`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use conformance_core::Fetched;
use conformance_core::RecordId;
use conformance_core::RecordKind;
use conformance_core::RecordStore;
use conformance_core::ReconciledRecord;
use conformance_core::StoreError;
use mongodb::Client;
use mongodb::Database;
use mongodb::bson::Document;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;

use crate::convert::document_to_fields;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Read-only record store backed by one MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoRecordStore {
    /// Database holding the service collections.
    database: Database,
}

impl MongoRecordStore {
    /// Creates a store from a connection string and database name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the connection string is invalid.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(Self::from_client(&client, database))
    }

    /// Creates a store from an existing client.
    #[must_use]
    pub fn from_client(client: &Client, database: &str) -> Self {
        Self {
            database: client.database(database),
        }
    }

    /// Returns the database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn fetch(&self, kind: &RecordKind, id: &RecordId) -> Result<Fetched, StoreError> {
        let oid =
            ObjectId::parse_str(id.as_str()).map_err(|err| StoreError::Decode(err.to_string()))?;
        let collection = self.database.collection::<Document>(kind.collection());
        let found = collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(found.map_or(Fetched::NotFound, |document| {
            let fields = document_to_fields(document);
            Fetched::Found(ReconciledRecord::new(kind.clone(), id.clone(), fields))
        }))
    }
}
