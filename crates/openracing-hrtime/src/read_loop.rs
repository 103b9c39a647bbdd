//! Background loop draining one bundle's timer into its channel.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::bundle::{Delivery, HandleBundle};
use crate::resource::TimerResource;

/// Drain `bundle` until its timer can no longer be read.
///
/// Expirations that arrive while the consumer is not waiting are folded into
/// the next delivery, so the consumer loses which intervals elapsed but never
/// how many. The loop holds the only reference it needs; it never looks at
/// the ticker that spawned it.
pub(crate) fn run<R: TimerResource>(bundle: Arc<HandleBundle<R>>) {
    let generation = bundle.generation();
    let mut since_last_delivery: u64 = 0;

    debug!(generation, "Ticker read loop started");

    loop {
        let elapsed = match bundle.resource().read() {
            Ok(elapsed) => elapsed,
            Err(e) => {
                debug!(generation, reason = %e, "Ticker read loop stopping");
                bundle.close();
                return;
            }
        };

        since_last_delivery = since_last_delivery.saturating_add(elapsed);

        match bundle.try_deliver(since_last_delivery) {
            Delivery::Delivered => since_last_delivery = 0,
            Delivery::Skipped => {
                trace!(
                    generation,
                    pending = since_last_delivery,
                    "Consumer not waiting, coalescing ticks"
                );
            }
            Delivery::Closed => {
                debug!(generation, "Ticker read loop observed closed bundle");
                return;
            }
        }
    }
}
