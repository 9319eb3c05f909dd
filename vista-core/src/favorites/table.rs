//! Reactive record table shared by the store implementations.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::BoxStream;
use tokio::sync::watch;

use super::FavoriteRecord;
use crate::media::MediaKind;
use crate::reactive::watch_projection;

pub(crate) type RecordMap = HashMap<String, FavoriteRecord>;

/// Current records behind a watch channel.
///
/// The map is only replaced or edited through the sender, so every receiver
/// observes each committed change.
#[derive(Debug)]
pub(crate) struct RecordTable {
    sender: watch::Sender<Arc<RecordMap>>,
}

impl RecordTable {
    pub(crate) fn new(records: RecordMap) -> Self {
        let (sender, _) = watch::channel(Arc::new(records));
        Self { sender }
    }

    pub(crate) fn current(&self) -> Arc<RecordMap> {
        Arc::clone(&self.sender.borrow())
    }

    pub(crate) fn get(&self, id: &str) -> Option<FavoriteRecord> {
        self.sender.borrow().get(id).cloned()
    }

    /// Publishes `records` as the new contents.
    pub(crate) fn commit(&self, records: RecordMap) {
        self.sender.send_replace(Arc::new(records));
    }

    /// Edits the contents in place. `edit` reports whether anything changed;
    /// receivers are only notified when it did.
    pub(crate) fn edit<R: Default>(&self, edit: impl FnOnce(&mut RecordMap) -> (bool, R)) -> R {
        let mut outcome = None;
        self.sender.send_if_modified(|records| {
            let (changed, result) = edit(Arc::make_mut(records));
            outcome = Some(result);
            changed
        });
        outcome.unwrap_or_default()
    }

    pub(crate) fn exists(&self, id: &str) -> BoxStream<'static, bool> {
        let id = id.to_string();
        watch_projection(self.sender.subscribe(), move |records: &Arc<RecordMap>| {
            records.contains_key(&id)
        })
    }

    pub(crate) fn list(&self, kind: Option<MediaKind>) -> BoxStream<'static, Vec<FavoriteRecord>> {
        watch_projection(self.sender.subscribe(), move |records: &Arc<RecordMap>| {
            sorted_records(records, kind)
        })
    }

    pub(crate) fn count(&self) -> BoxStream<'static, usize> {
        watch_projection(self.sender.subscribe(), |records: &Arc<RecordMap>| {
            records.len()
        })
    }
}

/// Records newest first, ties broken by id so output is deterministic.
pub(crate) fn sorted_records(records: &RecordMap, kind: Option<MediaKind>) -> Vec<FavoriteRecord> {
    let mut selected: Vec<FavoriteRecord> = records
        .values()
        .filter(|record| kind.is_none_or(|kind| record.kind == kind))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.added_at.cmp(&a.added_at).then_with(|| a.id.cmp(&b.id)));
    selected
}

/// Mutations shared by every store, applied to a record map.
///
/// Each returns `(changed, result)` in the shape [`RecordTable::edit`] takes.
pub(crate) mod apply {
    use super::RecordMap;
    use crate::favorites::FavoriteRecord;

    pub(crate) fn upsert(records: &mut RecordMap, record: FavoriteRecord) -> (bool, ()) {
        let changed = records.get(&record.id) != Some(&record);
        if changed {
            records.insert(record.id.clone(), record);
        }
        (changed, ())
    }

    pub(crate) fn delete(records: &mut RecordMap, id: &str) -> (bool, ()) {
        (records.remove(id).is_some(), ())
    }

    pub(crate) fn download_status(
        records: &mut RecordMap,
        id: &str,
        downloaded: bool,
        local_path: Option<String>,
    ) -> (bool, ()) {
        match records.get_mut(id) {
            Some(record) if record.downloaded != downloaded || record.local_path != local_path => {
                record.downloaded = downloaded;
                record.local_path = local_path;
                (true, ())
            }
            _ => (false, ()),
        }
    }

    /// Returns whether the id is present afterwards.
    pub(crate) fn flip(records: &mut RecordMap, record: FavoriteRecord) -> (bool, bool) {
        if records.remove(&record.id).is_some() {
            (true, false)
        } else {
            records.insert(record.id.clone(), record);
            (true, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::test_fixtures::sample_record;

    #[tokio::test]
    async fn test_unchanged_edit_does_not_notify() {
        let table = RecordTable::new(RecordMap::new());
        let mut receiver = table.sender.subscribe();
        receiver.borrow_and_update();

        table.edit(|records| apply::delete(records, "missing"));
        assert!(!receiver.has_changed().unwrap());

        table.edit(|records| apply::upsert(records, sample_record("1", MediaKind::Photo, 0)));
        assert!(receiver.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let table = RecordTable::new(RecordMap::new());
        for (id, minute) in [("a", 1), ("b", 3), ("c", 2)] {
            table.edit(|records| apply::upsert(records, sample_record(id, MediaKind::Photo, minute)));
        }

        let listed = table.list(None).next().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_flip_toggles_presence() {
        let mut records = RecordMap::new();
        let record = sample_record("7", MediaKind::Video, 0);

        assert_eq!(apply::flip(&mut records, record.clone()), (true, true));
        assert!(records.contains_key("7"));
        assert_eq!(apply::flip(&mut records, record), (true, false));
        assert!(records.is_empty());
    }

    #[test]
    fn test_download_status_ignores_unknown_id() {
        let mut records = RecordMap::new();
        let (changed, ()) = apply::download_status(&mut records, "9", true, None);
        assert!(!changed);
        assert!(records.is_empty());
    }
}
