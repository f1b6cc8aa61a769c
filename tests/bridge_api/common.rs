//! Shared test host: a mock symbol database with a call recorder.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use txbridge::{HostError, TxHost, TxId};

/// One observed host transaction call. Only successful calls are recorded;
/// a probe that misses leaves no entry, as a missing method would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Begin(String),
    End { id: u64, commit: bool },
    EndNotify { id: u64, commit: bool, notify: bool },
}

/// Shared view onto a host's recorded calls, readable from the test thread
/// while the host itself lives on the worker.
pub type Recorder = Arc<Mutex<Vec<Call>>>;

pub fn recorder() -> Recorder {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSupport {
    TwoArg,
    ThreeArgOnly,
    Neither,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("symbol not found: {0}")]
pub struct SymbolNotFound(pub String);

/// Mock of a versioned analysis database. Starts with a single symbol
/// `foo`; end-call support is configurable per host "version".
pub struct MockProgram {
    next_id: u64,
    symbols: Vec<String>,
    recorder: Recorder,
    end_support: EndSupport,
    fail_begin: bool,
    fail_end: bool,
}

impl MockProgram {
    pub fn new(recorder: Recorder) -> Self {
        Self::with_support(recorder, EndSupport::TwoArg)
    }

    pub fn with_support(recorder: Recorder, end_support: EndSupport) -> Self {
        MockProgram {
            next_id: 0,
            symbols: vec!["foo".to_string()],
            recorder,
            end_support,
            fail_begin: false,
            fail_end: false,
        }
    }

    pub fn failing_begin(recorder: Recorder) -> Self {
        let mut program = Self::new(recorder);
        program.fail_begin = true;
        program
    }

    pub fn failing_end(recorder: Recorder) -> Self {
        let mut program = Self::new(recorder);
        program.fail_end = true;
        program
    }

    pub fn rename_symbol(&mut self, from: &str, to: &str) -> Result<String, SymbolNotFound> {
        match self.symbols.iter().position(|s| s == from) {
            Some(index) => {
                self.symbols[index] = to.to_string();
                Ok(to.to_string())
            }
            None => Err(SymbolNotFound(from.to_string())),
        }
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.iter().any(|s| s == name)
    }
}

impl TxHost for MockProgram {
    fn begin_transaction(&mut self, name: &str) -> Result<TxId, HostError> {
        if self.fail_begin {
            return Err(HostError::Failed(format!("host refused `{name}`")));
        }
        self.next_id += 1;
        self.recorder.lock().push(Call::Begin(name.to_string()));
        Ok(TxId::new(self.next_id))
    }

    fn end_transaction(&mut self, id: TxId, commit: bool) -> Result<(), HostError> {
        match self.end_support {
            EndSupport::TwoArg => {
                if self.fail_end {
                    return Err(HostError::Failed("end rejected".to_string()));
                }
                self.recorder.lock().push(Call::End {
                    id: id.as_u64(),
                    commit,
                });
                Ok(())
            }
            _ => Err(HostError::unsupported("end_transaction")),
        }
    }

    fn end_transaction_notify(
        &mut self,
        id: TxId,
        commit: bool,
        notify: bool,
    ) -> Result<(), HostError> {
        match self.end_support {
            EndSupport::ThreeArgOnly => {
                self.recorder.lock().push(Call::EndNotify {
                    id: id.as_u64(),
                    commit,
                    notify,
                });
                Ok(())
            }
            _ => Err(HostError::unsupported("end_transaction_notify")),
        }
    }
}

/// Route library log output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
