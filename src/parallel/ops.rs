use std::ffi::OsString;
use std::fmt::{self, Display};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Boxed future returned by an asynchronous operation
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Synchronous per-item operation. Must absorb its own errors.
pub type SyncOp<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Asynchronous per-item operation. Must absorb its own errors.
pub type AsyncOp<T> = Arc<dyn Fn(T) -> BoxFuture + Send + Sync>;

/// Placeholder replaced by the work item in worker command arguments
pub const ITEM_PLACEHOLDER: &str = "{item}";

/// The operation pair applied to every work item, plus the command used to
/// apply the synchronous operation from a separate OS process.
pub struct Operations<T> {
    pub(crate) sync_op: SyncOp<T>,
    pub(crate) async_op: AsyncOp<T>,
    pub(crate) worker: WorkerCommand,
}

impl<T> Operations<T> {
    pub fn new(sync_op: SyncOp<T>, async_op: AsyncOp<T>, worker: WorkerCommand) -> Self {
        Self {
            sync_op,
            async_op,
            worker,
        }
    }

    pub fn worker(&self) -> &WorkerCommand {
        &self.worker
    }
}

impl<T> Clone for Operations<T> {
    fn clone(&self) -> Self {
        Self {
            sync_op: Arc::clone(&self.sync_op),
            async_op: Arc::clone(&self.async_op),
            worker: self.worker.clone(),
        }
    }
}

/// Wrap a plain closure as a [`SyncOp`]
pub fn sync_op<T, F>(f: F) -> SyncOp<T>
where
    F: Fn(&T) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap an async closure as an [`AsyncOp`]
pub fn async_op<T, F, Fut>(f: F) -> AsyncOp<T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |item| Box::pin(f(item)))
}

/// Program and argument template for one process-per-item worker.
///
/// Every `{item}` in the arguments is substituted with the item's display
/// form. Without a placeholder the item is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Worker that re-executes the running binary
    pub fn current_exe() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Resolve the argument template for one item
    pub fn args_for(&self, item: &str) -> Vec<OsString> {
        let mut substituted = false;
        let mut args: Vec<OsString> = self
            .args
            .iter()
            .map(|arg| match arg.to_str() {
                Some(text) if text.contains(ITEM_PLACEHOLDER) => {
                    substituted = true;
                    OsString::from(text.replace(ITEM_PLACEHOLDER, item))
                }
                _ => arg.clone(),
            })
            .collect();

        if !substituted {
            args.push(OsString::from(item));
        }
        args
    }

    /// Build the command for one item; stdin is closed, output is inherited
    pub fn command_for(&self, item: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args_for(item)).stdin(Stdio::null());
        command
    }
}

impl Display for WorkerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
