//! Session
//!
//! Runs the command loop for one client connection.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use crate::error::{CodecError, HeartGridError, Result};
use crate::grid::Grid;
use crate::protocol::{
    capacity_banner, decode_line, parse_command, Command, Reply, COMMAND_BANNER, MAX_LINE,
    PROMPT,
};

/// Outcome of reading one line from the client
enum Inbound {
    Line,
    TooLong,
    Eof,
}

/// One client's command loop
///
/// Generic over the line source and sink so the loop can run against
/// in-memory buffers as well as a socket.
pub struct Session<R, W> {
    /// Line source (buffered)
    reader: R,

    /// Response sink (buffered, flushed after every prompt and reply)
    writer: W,

    /// Shared grid; the session only goes through its validated operations
    grid: Arc<Grid>,

    /// Peer address for logging
    peer_addr: String,
}

impl Session<BufReader<TcpStream>, BufWriter<TcpStream>> {
    /// Wrap an accepted socket
    pub fn from_stream(stream: TcpStream, grid: Arc<Grid>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Prompts are tiny writes; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self::new(
            BufReader::new(read_stream),
            BufWriter::new(stream),
            grid,
            peer_addr,
        ))
    }
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W, grid: Arc<Grid>, peer_addr: impl Into<String>) -> Self {
        Self {
            reader,
            writer,
            grid,
            peer_addr: peer_addr.into(),
        }
    }

    /// Run until `quit`, end of input, or an I/O error
    ///
    /// Peer disconnects (EOF, reset, abort, broken pipe) end the session
    /// with `Ok`. Grid and codec errors never end it.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Connection accepted from {}", self.peer_addr);

        let outcome = self.command_loop();

        match outcome {
            Err(HeartGridError::Io(ref e)) if is_disconnect(e) => {
                tracing::debug!("Client {} dropped: {}", self.peer_addr, e);
                tracing::info!("Connection closed by {}", self.peer_addr);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Session with {} failed: {}", self.peer_addr, e);
                Err(e)
            }
            Ok(()) => {
                tracing::info!("Connection closed by {}", self.peer_addr);
                Ok(())
            }
        }
    }

    fn command_loop(&mut self) -> Result<()> {
        self.send_line(&capacity_banner())?;
        self.send_line(COMMAND_BANNER)?;

        let mut buf = Vec::new();
        loop {
            self.writer.write_all(PROMPT.as_bytes())?;
            self.writer.flush()?;

            let reply = match self.read_line(&mut buf)? {
                Inbound::Eof => return Ok(()),
                Inbound::TooLong => {
                    tracing::debug!(
                        "{} > <line over {} bytes, discarded>",
                        self.peer_addr,
                        MAX_LINE
                    );
                    Reply::line(CodecError::LineTooLong.to_string())
                }
                Inbound::Line => self.handle_line(&buf),
            };

            match reply {
                Reply::Close => return Ok(()),
                Reply::Silent => {}
                Reply::Line(text) => self.send_line(&text)?,
            }
        }
    }

    /// Read one line into `buf`, holding at most `MAX_LINE` bytes of content
    ///
    /// An over-long line is drained up to its newline and reported as
    /// `TooLong`, so memory stays bounded whatever the client sends.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<Inbound> {
        buf.clear();

        // Room for the content plus "\r\n"
        let limit = (MAX_LINE + 2) as u64;
        if (&mut self.reader).take(limit).read_until(b'\n', buf)? == 0 {
            return Ok(Inbound::Eof);
        }

        let complete = buf.ends_with(b"\n");
        let terminator = match (complete, buf.ends_with(b"\r\n")) {
            (true, true) => 2,
            (true, false) => 1,
            _ => 0,
        };

        if buf.len() - terminator <= MAX_LINE {
            return Ok(Inbound::Line);
        }
        if !complete {
            self.discard_line()?;
        }
        Ok(Inbound::TooLong)
    }

    /// Skip input up to and including the next newline (or EOF)
    fn discard_line(&mut self) -> Result<()> {
        loop {
            let available = self.reader.fill_buf()?;
            let len = available.len();
            if len == 0 {
                return Ok(());
            }

            let newline = available.iter().position(|&b| b == b'\n');
            match newline {
                Some(pos) => {
                    self.reader.consume(pos + 1);
                    return Ok(());
                }
                None => self.reader.consume(len),
            }
        }
    }

    /// Decode, parse and run one raw line
    fn handle_line(&self, raw: &[u8]) -> Reply {
        tracing::debug!(
            "{} > {}",
            self.peer_addr,
            String::from_utf8_lossy(raw).trim_end_matches(&['\r', '\n'][..])
        );

        let line = match decode_line(raw) {
            Ok(line) => line,
            Err(e) => return Reply::line(e.to_string()),
        };

        match parse_command(line) {
            Ok(Some(command)) => {
                tracing::trace!("{} running {}", self.peer_addr, command.keyword());
                execute(&self.grid, command)
            }
            Ok(None) => Reply::Silent,
            Err(e) => Reply::line(e.to_string()),
        }
    }

    fn send_line(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Run a command against the grid
pub fn execute(grid: &Grid, command: Command) -> Reply {
    match command {
        Command::Quit => Reply::Close,
        Command::Poke { address, payload } => match grid.write(address, &payload) {
            Ok(()) => Reply::Silent,
            Err(e) => Reply::line(e.to_string()),
        },
        Command::Peek { address, length } => match grid.read(address, length) {
            Ok(value) => Reply::Line(value),
            Err(e) => Reply::line(e.to_string()),
        },
    }
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
