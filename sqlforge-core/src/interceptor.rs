//! Post-render hooks over the final `(sql, args)` pair

use crate::Value;
use std::fmt;
use std::sync::Arc;
use tracing::Level;

/// A hook that observes or rewrites a rendered statement
///
/// It runs as the last step of every `build()`, after the statement has
/// been fully rendered.
pub trait Intercept: Send + Sync {
    fn intercept(&self, sql: String, args: Vec<Value>) -> (String, Vec<Value>);
}

impl<F> Intercept for F
where
    F: Fn(String, Vec<Value>) -> (String, Vec<Value>) + Send + Sync,
{
    fn intercept(&self, sql: String, args: Vec<Value>) -> (String, Vec<Value>) {
        self(sql, args)
    }
}

/// Shared handle to an [`Intercept`] implementation, cheap to clone into builders
#[derive(Clone)]
pub struct Interceptor(Arc<dyn Intercept>);

impl Interceptor {
    pub fn new<I>(hook: I) -> Self
    where
        I: Intercept + 'static,
    {
        Self(Arc::new(hook))
    }

    pub fn intercept(&self, sql: String, args: Vec<Value>) -> (String, Vec<Value>) {
        self.0.intercept(sql, args)
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Interceptor(..)")
    }
}

/// Run `interceptor` if there is one, otherwise pass the statement through
pub fn intercept(
    interceptor: Option<&Interceptor>,
    sql: String,
    args: Vec<Value>,
) -> (String, Vec<Value>) {
    match interceptor {
        Some(hook) => hook.intercept(sql, args),
        None => (sql, args),
    }
}

/// Logs every rendered statement through `tracing`, leaving it unchanged
#[derive(Debug, Clone)]
pub struct TracingInterceptor {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingInterceptor {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }

    fn emit(&self, sql: &str, arg_count: usize) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        emit_at_level!(
            self.level,
            target: "sqlforge.sql",
            arg_count,
            sql = %sql,
        );
    }
}

impl Intercept for TracingInterceptor {
    fn intercept(&self, sql: String, args: Vec<Value>) -> (String, Vec<Value>) {
        self.emit(&self.truncate_sql(&sql), args.len());
        (sql, args)
    }
}

impl From<TracingInterceptor> for Interceptor {
    fn from(hook: TracingInterceptor) -> Self {
        Interceptor::new(hook)
    }
}
