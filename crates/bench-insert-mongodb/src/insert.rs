//! Buffered bulk-insert session for MongoDB.

use crate::error::MongoStoreError;
use bench_core::Document as BenchDocument;
use bench_insert::{BulkInsertSession, InsertError};
use bson::oid::ObjectId;
use bson::Document;
use mongodb::sync::Database;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Bulk-insert session writing unordered `insert_many` batches.
///
/// Documents are buffered per collection; a collection's buffer is written
/// as soon as it holds `batch_size` documents.
pub struct MongoBulkInsert {
    database: Database,
    batch_size: usize,
    buffers: HashMap<&'static str, Vec<Document>>,
    stored: u64,
    batches: u64,
}

impl MongoBulkInsert {
    pub(crate) fn new(database: Database, batch_size: usize) -> Self {
        Self {
            database,
            batch_size: batch_size.max(1),
            buffers: HashMap::new(),
            stored: 0,
            batches: 0,
        }
    }

    fn write_collection(&mut self, collection_name: &str) -> Result<(), MongoStoreError> {
        let documents = match self.buffers.get_mut(collection_name) {
            Some(buffer) if !buffer.is_empty() => std::mem::take(buffer),
            _ => return Ok(()),
        };

        let count = documents.len();
        let collection = self.database.collection::<Document>(collection_name);
        let result = collection.insert_many(documents).ordered(false).run()?;

        self.batches += 1;
        debug!(
            "Batch {} written to '{}': {} of {} documents inserted",
            self.batches,
            collection_name,
            result.inserted_ids.len(),
            count
        );
        Ok(())
    }
}

/// Convert a document to BSON after assigning it a fresh identifier.
pub(crate) fn assign_and_convert<D: BenchDocument>(
    document: &mut D,
) -> Result<Document, InsertError> {
    document.set_id(ObjectId::new().to_hex());
    Ok(bson::to_document(&*document)?)
}

impl BulkInsertSession for MongoBulkInsert {
    fn store<D: BenchDocument>(&mut self, document: &mut D) -> Result<(), InsertError> {
        let body = assign_and_convert(document)?;
        trace!("Buffering document {:?} for '{}'", document.id(), D::COLLECTION);

        let buffer = self.buffers.entry(D::COLLECTION).or_default();
        buffer.push(body);
        let full = buffer.len() >= self.batch_size;
        self.stored += 1;

        if full {
            self.write_collection(D::COLLECTION)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), InsertError> {
        let pending: Vec<&'static str> = self
            .buffers
            .iter()
            .filter(|(_, buffer)| !buffer.is_empty())
            .map(|(name, _)| *name)
            .collect();

        for name in pending {
            self.write_collection(name)?;
        }
        Ok(())
    }

    fn buffered(&self) -> usize {
        self.buffers.values().map(Vec::len).sum()
    }

    fn stored(&self) -> u64 {
        self.stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_generator::UserGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_assign_and_convert() {
        let mut user = UserGenerator::new(StdRng::seed_from_u64(42)).next_user();

        let doc = assign_and_convert(&mut user).unwrap();

        let id = user.id.clone().unwrap();
        assert_eq!(id.len(), 24, "ObjectId hex is 24 characters");
        assert_eq!(doc.get_str("_id").unwrap(), id);
        assert_eq!(doc.get_str("name").unwrap(), user.name);
        assert_eq!(doc.get_str("email").unwrap(), user.email);
        assert_eq!(doc.get_array("friends").unwrap().len(), user.friends.len());
        assert!(doc.get_document("address").unwrap().contains_key("line1"));
        assert!(doc.contains_key("lastMessage"));
    }

    #[test]
    fn test_identifiers_are_unique_per_insert() {
        let mut user = UserGenerator::new(StdRng::seed_from_u64(1)).next_user();

        assign_and_convert(&mut user).unwrap();
        let first = user.id.take().unwrap();
        assign_and_convert(&mut user).unwrap();
        let second = user.id.take().unwrap();

        assert_ne!(first, second);
    }
}
