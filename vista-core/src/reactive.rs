//! Streams over `watch` channels.
//!
//! Every stream starts with the value current at subscription time and then
//! follows changes. Each stream owns its own receiver, so dropping one never
//! affects other subscribers of the same channel.

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::watch;

/// Stream of every value published on `receiver`, starting with the current one.
///
/// Intermediate values published faster than the consumer polls are skipped;
/// the latest value is always delivered.
pub fn watch_stream<T>(receiver: watch::Receiver<T>) -> BoxStream<'static, T>
where
    T: Clone + Send + Sync + 'static,
{
    stream::unfold((receiver, true), |(mut receiver, first)| async move {
        if !first && receiver.changed().await.is_err() {
            return None;
        }
        let value = receiver.borrow_and_update().clone();
        Some((value, (receiver, false)))
    })
    .boxed()
}

/// Stream of `project(value)` that only emits when the projection changes.
pub fn watch_projection<T, U, F>(receiver: watch::Receiver<T>, project: F) -> BoxStream<'static, U>
where
    T: Send + Sync + 'static,
    U: Clone + PartialEq + Send + 'static,
    F: Fn(&T) -> U + Send + Sync + 'static,
{
    stream::unfold(
        (receiver, project, None::<U>),
        |(mut receiver, project, last)| async move {
            loop {
                if last.is_some() && receiver.changed().await.is_err() {
                    return None;
                }
                let value = project(&receiver.borrow_and_update());
                if last.as_ref() != Some(&value) {
                    return Some((value.clone(), (receiver, project, Some(value))));
                }
            }
        },
    )
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watch_stream_replays_current_value() {
        let (sender, receiver) = watch::channel(1);
        let mut values = watch_stream(receiver);

        assert_eq!(values.next().await, Some(1));
        sender.send_replace(2);
        assert_eq!(values.next().await, Some(2));

        drop(sender);
        assert_eq!(values.next().await, None);
    }

    #[tokio::test]
    async fn test_projection_skips_unchanged_values() {
        let (sender, receiver) = watch::channel(vec![1]);
        let mut lengths = watch_projection(receiver, |values: &Vec<i32>| values.is_empty());

        assert_eq!(lengths.next().await, Some(false));
        sender.send_modify(|values| values.push(2));
        sender.send_modify(|values| values.clear());
        assert_eq!(lengths.next().await, Some(true));
    }

    #[tokio::test]
    async fn test_dropping_one_stream_keeps_others() {
        let (sender, receiver) = watch::channel(0);
        let first = watch_stream(receiver.clone());
        let mut second = watch_stream(receiver);

        drop(first);
        sender.send_replace(5);
        assert_eq!(second.next().await, Some(5));
    }
}
