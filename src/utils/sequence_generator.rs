use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};

use crate::{constants::*, database::AppDatabase};

/// Read the counter out of a sequence document. Mongo may hand the
/// value back as either a 32 or 64 bit integer.
fn counter_value(seq_id: &str, counter: &Document) -> anyhow::Result<u32> {
    let val = match counter.get("val") {
        Some(Bson::Int32(val)) => i64::from(*val),
        Some(Bson::Int64(val)) => *val,
        other => anyhow::bail!("Sequence {seq_id} has no usable counter: {other:?}"),
    };
    u32::try_from(val)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| anyhow::anyhow!("Sequence {seq_id} produced an invalid id: {val}"))
}

/// Atomically bump the named counter and return the new id
pub async fn next_id(seq_id: &str, db: &AppDatabase) -> anyhow::Result<u32> {
    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();
    let counter = db
        .find_one_and_update::<Document>(
            DB_NAME,
            COLL_SEQUENCES,
            doc! {"_id": seq_id},
            doc! {"$inc": {"val": 1}},
            Some(options),
        )
        .await?
        .ok_or_else(|| anyhow::anyhow!("Sequence {seq_id} was not created"))?;
    counter_value(seq_id, &counter)
}
