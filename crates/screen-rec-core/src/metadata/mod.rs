mod record;
mod store;

pub use {
    record::RecordingRecord,
    store::{AddOutcome, METADATA_FILE, MetadataStore},
};
