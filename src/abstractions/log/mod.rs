/*!

Leveled logging with a numeric verbosity threshold, built on `tracing`.

Every message has a *level* (critical, error, warning, info, debug, trace) describing what kind of message it is, and
a *threshold* describing how chatty it is. A message is emitted only if its threshold is at most the global logging
threshold. Threshold 0 is always emitted; the default global threshold is 3.

```
use kgrammar::log::*;

set_global_logging_threshold(2);
info!(1, "building grammar for {}", "IMP");     // Emitted
debug!(3, "productions: {}", 42);               // Not emitted
warning!("skipping incomplete user list");      // Emitted (threshold 0)
```

The grammar transforms use the following convention:

| Threshold | Used for                                                 |
|:----------|:---------------------------------------------------------|
| 0         | errors that abort a module's grammar build               |
| 1         | recoverable oddities in the input (incomplete lists)     |
| 2         | one line per grammar-bundle stage                        |
| 3         | per-transform summaries (how many productions were added) |
| 4         | per-production detail                                    |

# Macros

`critical!`, `error!`, `warning!`, `info!`, `debug!`, `trace!`, each taking either

```ignore
level!(threshold, "format string", args...);
level!("message without arguments");
```

A message with format arguments must give its threshold explicitly, since a leading string literal is otherwise
taken to be the threshold.

The macros initialize the subscriber on first use, so no setup call is needed. The global threshold is an atomic and
may be changed from any thread at any time.

*/
mod formatter;
mod threshold_filter;
mod macros;

use std::sync::atomic::{AtomicU8, Ordering};

use once_cell::sync::Lazy;
use tracing_subscriber::{
  fmt,
  layer::SubscriberExt,
  Registry
};

use threshold_filter::ThresholdFilterLayer;
use formatter::ThresholdHidingFormatter;
pub use macros::*;

// The macros expand to `$crate::log::tracing::event!` so that downstream crates need not depend on `tracing`.
#[doc(hidden)]
pub use tracing;

/// Installs the global subscriber exactly once. If the host application already installed one, we leave it alone.
static INIT_LOGGER: Lazy<()> = Lazy::new(|| {
  let subscriber = Registry::default()
      .with(ThresholdFilterLayer)
      .with(
        fmt::layer()
            .fmt_fields(ThresholdHidingFormatter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr),
      );

  let _ = tracing::subscriber::set_global_default(subscriber);
});

/// Initializes the logging system. The logging macros call this; it does not need to be called directly.
pub fn init_logger() {
  Lazy::force(&INIT_LOGGER);
}

static GLOBAL_LOGGING_THRESHOLD: AtomicU8 = AtomicU8::new(3);

/// Sets the global threshold. Messages logged at a greater threshold are suppressed.
pub fn set_global_logging_threshold(new_threshold: u8) {
  GLOBAL_LOGGING_THRESHOLD.store(new_threshold, Ordering::SeqCst);
}

pub fn get_global_logging_threshold() -> u8 {
  GLOBAL_LOGGING_THRESHOLD.load(Ordering::SeqCst)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn threshold_round_trips() {
    let previous = get_global_logging_threshold();

    set_global_logging_threshold(4);
    assert_eq!(get_global_logging_threshold(), 4);

    // Emitted at 4, suppressed at 1.
    debug!(4, "cast synthesis added {} productions", 12);
    set_global_logging_threshold(1);
    trace!(4, "NOT logged: rewrote terminal {}", "==");
    warning!("An incomplete user list was skipped.");
    critical!(0, "malformed cell {}", "<k>");

    set_global_logging_threshold(previous);
  }
}
