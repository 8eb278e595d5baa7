// ── Audit notes ──
//
// Append-only: one note per reconciliation that changed or created
// something, written only after the device id is known.

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::mapping::FieldMapping;
use crate::model::{Fields, RecordId};
use crate::store::RecordStore;

/// Link `text` to `device_id` in the notes table.
///
/// No-op (returns `Ok(None)`) when there is no text or it is empty.
pub async fn record<S: RecordStore>(
    store: &S,
    mapping: &FieldMapping,
    device_id: RecordId,
    text: Option<&str>,
) -> Result<Option<RecordId>, CoreError> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let mut fields = Fields::new();
    fields.insert(mapping.note_device_column.clone(), Value::from(device_id));
    fields.insert(mapping.note_text_column.clone(), Value::from(text));

    let note_id = store.add(&mapping.notes_table, &fields).await?;
    debug!(device = %device_id, note = %note_id, "audit note recorded");
    Ok(Some(note_id))
}
