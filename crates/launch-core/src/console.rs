//! Output streams for one invocation.
//!
//! Instead of swapping the process-wide stdout/stderr, every invocation writes
//! through a [`Console`] handed out by a [`StreamScope`]. The scope holds a
//! process-wide lock, so two embedded invocations never interleave their
//! redirections, and dropping it flushes whatever the invocation wrote.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

static STREAMS_LOCK: Mutex<()> = Mutex::new(());

/// A cloneable handle to a writer shared between the console and the logger.
#[derive(Clone)]
pub struct SharedWriter(Arc<Mutex<Box<dyn Write + Send>>>);

impl SharedWriter {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Box::new(writer))))
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// The out/err pair an invocation prints through.
#[derive(Debug, Clone)]
pub struct Console {
    out: SharedWriter,
    err: SharedWriter,
    redirected: bool,
}

impl Console {
    pub const fn new(out: SharedWriter, err: SharedWriter) -> Self {
        Self {
            out,
            err,
            redirected: false,
        }
    }

    pub fn stdio() -> Self {
        Self::new(SharedWriter::stdout(), SharedWriter::stderr())
    }

    pub fn out(&self) -> SharedWriter {
        self.out.clone()
    }

    pub fn err(&self) -> SharedWriter {
        self.err.clone()
    }

    pub const fn is_redirected(&self) -> bool {
        self.redirected
    }

    /// Print a line to the out stream. Console output is best-effort.
    pub fn println(&self, line: impl std::fmt::Display) {
        let _ = writeln!(self.out(), "{line}");
    }

    /// Print a line to the err stream.
    pub fn eprintln(&self, line: impl std::fmt::Display) {
        let _ = writeln!(self.err(), "{line}");
    }

    /// Send both streams to `path`, truncating it.
    pub fn redirect_to_file(&mut self, path: &Path) -> io::Result<()> {
        let file = SharedWriter::new(File::create(path)?);
        self.out = file.clone();
        self.err = file;
        self.redirected = true;
        Ok(())
    }

    pub fn flush(&self) {
        let _ = self.out().flush();
        let _ = self.err().flush();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}

/// Exclusive use of the output streams for one bootstrap call.
pub struct StreamScope {
    console: Console,
    _lock: MutexGuard<'static, ()>,
}

impl StreamScope {
    pub fn acquire(base: &Console) -> Self {
        let lock = STREAMS_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            console: Console::new(base.out(), base.err()),
            _lock: lock,
        }
    }

    pub const fn console(&self) -> &Console {
        &self.console
    }

    pub const fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }
}

impl Drop for StreamScope {
    fn drop(&mut self) {
        self.console.flush();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Buffer;
    use super::*;

    #[test]
    fn test_console_writes_to_given_streams() {
        let out = Buffer::default();
        let err = Buffer::default();
        let console = Console::new(out.writer(), err.writer());

        console.println("to out");
        console.eprintln("to err");

        assert_eq!(out.contents(), "to out\n");
        assert_eq!(err.contents(), "to err\n");
    }

    #[test]
    fn test_redirect_leaves_base_console_alone() {
        let out = Buffer::default();
        let err = Buffer::default();
        let base = Console::new(out.writer(), err.writer());
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("out.log");

        {
            let mut scope = StreamScope::acquire(&base);
            scope.console_mut().redirect_to_file(&log).unwrap();
            assert!(scope.console().is_redirected());
            scope.console().println("redirected");
            scope.console().eprintln("also redirected");
        }

        base.println("after");
        assert_eq!(out.contents(), "after\n");
        assert_eq!(err.contents(), "");
        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "redirected\nalso redirected\n"
        );
    }

    #[test]
    fn test_failed_redirect_keeps_streams() {
        let out = Buffer::default();
        let base = Console::new(out.writer(), Buffer::default().writer());
        let mut scope = StreamScope::acquire(&base);

        let missing = Path::new("/definitely/not/a/dir/out.log");
        assert!(scope.console_mut().redirect_to_file(missing).is_err());
        assert!(!scope.console().is_redirected());
        scope.console().println("still here");
        drop(scope);

        assert_eq!(out.contents(), "still here\n");
    }
}
