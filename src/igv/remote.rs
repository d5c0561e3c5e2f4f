//! A client for the desktop IGV batch-command port.
//!
//! Desktop IGV listens on a plain-text port (60151 by default) and accepts
//! one command per line: `new`, `goto`, `load`, view commands like
//! `collapse`, and so on, answering each with a single `OK` line. This
//! client sends those commands and surfaces anything else IGV says as an
//! error. The alignment files themselves are never touched here; IGV opens
//! them on its side.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use log::debug;

use crate::error::ReviewError;

/// The default IGV batch-command address.
pub const DEFAULT_IGV_ADDR: &str = "127.0.0.1:60151";

/// How alignment reads are drawn in the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewMode {
    #[default]
    Collapse,
    Expand,
    Squish,
}

impl ViewMode {
    pub fn as_command(&self) -> &'static str {
        match self {
            ViewMode::Collapse => "collapse",
            ViewMode::Expand => "expand",
            ViewMode::Squish => "squish",
        }
    }
}

/// A connection to a locally running desktop IGV.
pub struct IgvClient {
    addr: String,
    recv_timeout: Duration,
    stream: Option<TcpStream>,
}

impl IgvClient {
    pub fn new(addr: impl Into<String>, recv_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            recv_timeout,
            stream: None,
        }
    }

    /// Connect to IGV. A lingering connection from an earlier session is
    /// closed first, and a failed attempt is retried once after closing.
    pub fn connect(&mut self) -> Result<(), ReviewError> {
        if self.stream.is_some() {
            self.close();
        }
        if self.try_connect().is_err() {
            self.close();
            return self.try_connect();
        }
        Ok(())
    }

    fn try_connect(&mut self) -> Result<(), ReviewError> {
        let stream = TcpStream::connect(&self.addr)
            .map_err(|err| ReviewError::IgvConnection(self.addr.clone(), err))?;
        stream.set_read_timeout(Some(self.recv_timeout))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Send one batch command and check the single-line response.
    fn command(&mut self, command: &str) -> Result<(), ReviewError> {
        let stream = self.stream.as_mut().ok_or(ReviewError::IgvDisconnected)?;
        debug!("igv <- {}", command);
        writeln!(stream, "{}", command)?;
        stream.flush()?;

        let mut reader = BufReader::new(stream.try_clone()?);
        let mut response = String::new();
        if reader.read_line(&mut response)? == 0 {
            return Err(ReviewError::IgvDisconnected);
        }
        let response = response.trim().to_string();
        debug!("igv -> {}", response);
        if response != "OK" {
            return Err(ReviewError::IgvCommand {
                command: command.to_string(),
                response,
            });
        }
        Ok(())
    }

    /// Start a fresh IGV session, clearing any loaded tracks.
    pub fn new_session(&mut self) -> Result<(), ReviewError> {
        self.command("new")
    }

    /// Apply the read display mode and sort order.
    pub fn set_view_options(&mut self, view: ViewMode, sort: &str) -> Result<(), ReviewError> {
        self.command(view.as_command())?;
        self.command(&format!("sort {}", sort))
    }

    /// Navigate to one or more loci at once.
    pub fn goto(&mut self, loci: &[String]) -> Result<(), ReviewError> {
        self.command(&format!("goto {}", loci.join(" ")))
    }

    /// Load one alignment file by path or URL.
    pub fn load(&mut self, path: &str) -> Result<(), ReviewError> {
        self.command(&format!("load {}", path))
    }

    /// Drop the connection. Safe to call when not connected.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl Drop for IgvClient {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// A one-connection fake IGV that answers each command line with the
    /// given responses (then `OK` forever) and reports what it received.
    fn fake_igv(responses: Vec<&'static str>) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut responses = responses.into_iter();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                sender.send(line.trim().to_string()).unwrap();
                let response = responses.next().unwrap_or("OK");
                writeln!(stream, "{}", response).unwrap();
            }
        });
        (addr, receiver)
    }

    #[test]
    fn test_session_command_sequence() {
        let (addr, received) = fake_igv(vec![]);
        let mut client = IgvClient::new(addr, Duration::from_secs(5));
        client.connect().unwrap();
        client.new_session().unwrap();
        client.set_view_options(ViewMode::Collapse, "base").unwrap();
        client.goto(&["17:7571820".to_string()]).unwrap();
        client.load("gs://bams/p1_tumor.bam").unwrap();
        client.close();

        let commands: Vec<String> = received.iter().collect();
        assert_eq!(
            commands,
            vec![
                "new",
                "collapse",
                "sort base",
                "goto 17:7571820",
                "load gs://bams/p1_tumor.bam"
            ]
        );
    }

    #[test]
    fn test_non_ok_response_is_an_error() {
        let (addr, _received) = fake_igv(vec!["ERROR unknown command"]);
        let mut client = IgvClient::new(addr, Duration::from_secs(5));
        client.connect().unwrap();
        let result = client.new_session();
        match result {
            Err(ReviewError::IgvCommand { command, response }) => {
                assert_eq!(command, "new");
                assert_eq!(response, "ERROR unknown command");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_connect_refused() {
        // bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut client = IgvClient::new(addr, Duration::from_secs(1));
        assert!(matches!(
            client.connect(),
            Err(ReviewError::IgvConnection(_, _))
        ));
    }

    #[test]
    fn test_goto_multiple_loci() {
        let (addr, received) = fake_igv(vec![]);
        let mut client = IgvClient::new(addr, Duration::from_secs(5));
        client.connect().unwrap();
        client
            .goto(&["2:29443600".to_string(), "17:7571820".to_string()])
            .unwrap();
        client.close();

        let commands: Vec<String> = received.iter().collect();
        assert_eq!(commands, vec!["goto 2:29443600 17:7571820"]);
    }
}
