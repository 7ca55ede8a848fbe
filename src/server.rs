use std::fs;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::buffer::FrameBuffer;
use crate::config::ServerConfig;
use crate::connection::serve_connection;
use crate::detect::{detection_loop, CodeScanner, Detector};
use crate::error::{Error, Result};
use crate::hub::ClientHub;

/// Lifecycle of a [`QrServer`]. `Stopped` is terminal; a stopped server
/// cannot be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Started,
    Running,
    Stopping,
    Stopped,
}

/// The relay server: accepts frame streams over TCP, feeds the bounded
/// buffer, runs the detection loop, and fans results out to every live
/// client.
pub struct QrServer {
    config: ServerConfig,
    state: Mutex<ServerState>,
    running: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    buffer: Arc<FrameBuffer>,
    hub: Arc<ClientHub>,
    detector: Arc<Detector>,
    local_addr: Mutex<Option<SocketAddr>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl QrServer {
    pub fn new(config: ServerConfig, scanner: Box<dyn CodeScanner>) -> Self {
        let (shutdown, _) = watch::channel(false);
        let buffer = Arc::new(FrameBuffer::new(config.buffer_capacity));
        Self {
            state: Mutex::new(ServerState::Created),
            running: Arc::new(AtomicBool::new(false)),
            shutdown,
            buffer,
            hub: Arc::new(ClientHub::new()),
            detector: Arc::new(Detector::new(scanner)),
            local_addr: Mutex::new(None),
            worker: Mutex::new(None),
            config,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        *self.state.lock()
    }

    /// Address the listener is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    /// Live client connections.
    pub fn connection_count(&self) -> usize {
        self.hub.connection_count()
    }

    /// Binds the listener, writes the readiness file, launches the
    /// detection loop, and serves the accept loop until
    /// [`stop`](Self::stop) is called.
    ///
    /// Starting a server twice, or reusing a stopped one, is an error.
    pub async fn start(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if *state != ServerState::Created {
                return Err(Error::AlreadyStarted);
            }
            *state = ServerState::Started;
        }

        self.remove_ready_file(true);

        let addr = self.config.addr();
        log::info!("binding to {addr}");
        let listener = TcpListener::bind(addr.as_str())
            .await
            .map_err(|source| Error::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        *self.local_addr.lock() = Some(local_addr);

        self.write_ready_file(local_addr)?;

        self.running.store(true, Ordering::Relaxed);
        let worker = tokio::spawn(detection_loop(
            self.buffer.clone(),
            self.hub.clone(),
            self.detector.clone(),
            self.running.clone(),
            self.config.poll_interval,
        ));
        *self.worker.lock() = Some(worker);

        // stop() may have raced us during startup; only a Started server
        // enters the accept loop.
        let proceed = {
            let mut state = self.state.lock();
            if *state == ServerState::Started {
                *state = ServerState::Running;
                true
            } else {
                false
            }
        };
        if !proceed {
            self.running.store(false, Ordering::Relaxed);
            return Ok(());
        }
        log::info!("server listening on {local_addr}");

        let mut shutdown = self.shutdown.subscribe();
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(serve_connection(
                            stream,
                            peer,
                            self.hub.clone(),
                            self.buffer.clone(),
                            self.shutdown.subscribe(),
                        ));
                    }
                    Err(err) => log::error!("failed to accept connection: {err}"),
                },
            }
        }

        Ok(())
    }

    /// Signals every loop to stop, closes all connections, waits for the
    /// detection loop, and removes the readiness file. Safe to call any
    /// number of times.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock();
            match *state {
                ServerState::Stopping | ServerState::Stopped => return,
                _ => *state = ServerState::Stopping,
            }
        }
        log::info!("stopping server");

        self.running.store(false, Ordering::Relaxed);
        let _ = self.shutdown.send(true);
        self.hub.clear();

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                log::error!("detection loop did not shut down cleanly: {err}");
            }
        }

        self.remove_ready_file(false);
        *self.state.lock() = ServerState::Stopped;
        log::info!("server stopped");
    }

    /// Writes the readiness file after a successful bind. A failure here
    /// is fatal for startup and leaves no partial file behind.
    fn write_ready_file(&self, addr: SocketAddr) -> Result<()> {
        let Some(path) = &self.config.ready_file else {
            return Ok(());
        };
        let contents = format!("{}:{}", self.config.host, addr.port());
        if let Err(source) = fs::write(path, contents) {
            let _ = fs::remove_file(path);
            return Err(Error::ReadyFile {
                path: path.clone(),
                source,
            });
        }
        log::info!("ready file created at {}", path.display());
        Ok(())
    }

    fn remove_ready_file(&self, stale: bool) {
        let Some(path) = &self.config.ready_file else {
            return;
        };
        if !path.exists() {
            return;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                if stale {
                    log::info!("removed stale ready file");
                }
            }
            Err(err) => log::warn!("failed to remove ready file {}: {err}", path.display()),
        }
    }
}
