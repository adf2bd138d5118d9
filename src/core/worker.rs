//! Double-buffer producer/consumer hand-off
//!
//! A `SwapWorker` owns the thread boundary of the logging pipeline. Producers
//! append rendered records to a producer-side buffer under one mutex; a
//! single consumer thread swaps that buffer against its own empty one in
//! O(1) and runs the fan-out callback on the drained batch with the lock
//! released. Slow sinks therefore never hold producers off directly; the
//! only coupling is buffer pressure ([`OverflowPolicy::Block`]) or memory
//! growth ([`OverflowPolicy::Grow`]).

use super::buffer::{BufferConfig, SwapBuffer};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;

/// What a producer does when its record does not fit the producer buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Wait until the consumer drains the buffer. Peak memory per worker is
    /// bounded by two buffers of the largest observed capacity.
    #[default]
    Block,
    /// Grow the producer buffer without bound and never wait. Memory covers
    /// the worst burst between two consumer wake-ups.
    Grow,
}

/// Fan-out callback run by the consumer thread for every drained batch.
pub type FlushFn = Box<dyn FnMut(&[u8]) + Send>;

struct State {
    producer: SwapBuffer,
    stop: bool,
}

struct Shared {
    state: Mutex<State>,
    /// Consumer waits here for data or stop.
    data_available: Condvar,
    /// Blocked producers wait here for the post-swap space.
    space_available: Condvar,
}

pub struct SwapWorker {
    shared: Arc<Shared>,
    policy: OverflowPolicy,
    consumer: Option<thread::JoinHandle<()>>,
}

impl SwapWorker {
    /// Start the consumer thread. `callback` is owned by that thread and
    /// dropped when it exits, so anything the callback closes over (the sink
    /// list) outlives every batch it is handed.
    pub fn spawn(config: &BufferConfig, policy: OverflowPolicy, callback: FlushFn) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                producer: SwapBuffer::with_config(config),
                stop: false,
            }),
            data_available: Condvar::new(),
            space_available: Condvar::new(),
        });

        let consumer = {
            let shared = Arc::clone(&shared);
            let batch = SwapBuffer::with_config(config);
            thread::Builder::new()
                .name("fanlog-consumer".to_string())
                .spawn(move || consumer_loop(&shared, policy, batch, callback))
                .expect("failed to spawn log consumer thread")
        };

        Self {
            shared,
            policy,
            consumer: Some(consumer),
        }
    }

    /// Append one rendered record.
    ///
    /// Under [`OverflowPolicy::Block`] the call waits until the record fits
    /// the producer buffer or the buffer has been drained empty (an empty
    /// buffer admits any record through one bounded growth step), so two
    /// buffers of peak capacity bound the worker's memory. Under
    /// [`OverflowPolicy::Grow`] the append is immediate.
    ///
    /// Records pushed by threads serialized on this call are delivered to
    /// sinks in exactly this order.
    pub fn push(&self, data: &[u8]) {
        let mut state = self.shared.state.lock();
        if self.policy == OverflowPolicy::Block {
            while data.len() > state.producer.writable()
                && !state.producer.is_empty()
                && !state.stop
            {
                self.shared.space_available.wait(&mut state);
            }
        }
        state.producer.push(data);
        drop(state);
        self.shared.data_available.notify_one();
    }

    /// Stop the consumer after it drains everything queued so far. Safe to
    /// call more than once; the second call returns immediately.
    pub fn stop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            if state.stop {
                return;
            }
            state.stop = true;
        }
        self.shared.data_available.notify_all();
        self.shared.space_available.notify_all();
        if let Some(handle) = self.consumer.take() {
            if handle.join().is_err() {
                eprintln!("[fanlog] consumer thread panicked during shutdown");
            }
        }
    }
}

impl Drop for SwapWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn consumer_loop(
    shared: &Shared,
    policy: OverflowPolicy,
    mut batch: SwapBuffer,
    mut callback: FlushFn,
) {
    loop {
        let stopping;
        {
            let mut state = shared.state.lock();
            while !state.stop && state.producer.is_empty() {
                shared.data_available.wait(&mut state);
            }
            state.producer.swap(&mut batch);
            stopping = state.stop;
            if policy == OverflowPolicy::Block {
                shared.space_available.notify_one();
            }
        }

        // Fan out with the lock released; sink latency only ever shows up to
        // producers as buffer pressure.
        if batch.readable() > 0 {
            callback(batch.as_slice());
            batch.reset();
        }

        // A stop that arrived while data was queued has just been drained by
        // the swap above; only return once the producer side is empty too.
        if stopping && shared.state.lock().producer.is_empty() {
            return;
        }
    }
}
