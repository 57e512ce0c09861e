//! Live projections over a `watch` channel.
//!
//! A projection yields the current value immediately, then every distinct
//! value after a change, until the source is closed or the stream dropped.

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

pub type LiveStream<T> = BoxStream<'static, T>;

struct Projection<S, T, F> {
    source: watch::Receiver<S>,
    map: F,
    last: Option<T>,
    started: bool,
}

/// Project every value of `source` through `map`, skipping repeats.
pub fn project<S, T, F>(source: watch::Receiver<S>, map: F) -> LiveStream<T>
where
    S: Send + Sync + 'static,
    T: Clone + PartialEq + Send + 'static,
    F: Fn(&S) -> T + Send + 'static,
{
    let projection = Projection {
        source,
        map,
        last: None,
        started: false,
    };

    stream::unfold(projection, |mut p| async move {
        loop {
            if p.started {
                p.source.changed().await.ok()?;
            } else {
                p.started = true;
            }

            let value = (p.map)(&p.source.borrow_and_update());
            if p.last.as_ref() != Some(&value) {
                p.last = Some(value.clone());
                return Some((value, p));
            }
        }
    })
    .boxed()
}
