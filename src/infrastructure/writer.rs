//! Channel that writes newline-delimited payloads to an async writer
//!
//! Used as the `stdout` transport for local dry runs.

use crate::application::channel::{Channel, ChannelError};
use crate::domain::ChannelName;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

pub struct WriterChannel<W> {
    name: ChannelName,
    writer: Mutex<W>,
}

/// Writes every payload as one line on standard output
pub type StdoutChannel = WriterChannel<Stdout>;

impl StdoutChannel {
    pub fn stdout(name: ChannelName) -> Self {
        Self::new(name, tokio::io::stdout())
    }
}

impl<W> WriterChannel<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: ChannelName, writer: W) -> Self {
        Self {
            name,
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> Channel for WriterChannel<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &ChannelName {
        &self.name
    }

    async fn push(&self, payload: Bytes) -> Result<(), ChannelError> {
        let mut writer = self.writer.lock().await;
        let result = async {
            writer.write_all(&payload).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        result.map_err(|e| ChannelError::Transport(format!("{}: {e}", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn payloads_are_newline_delimited() {
        let name = ChannelName::try_new("eventmakervibe".to_string()).unwrap();
        let channel = WriterChannel::new(name, Vec::new());

        channel.push(Bytes::from_static(b"{\"a\":1}")).await.unwrap();
        channel.push(Bytes::from_static(b"{\"a\":2}")).await.unwrap();

        let written = channel.into_inner();
        assert_eq!(written, b"{\"a\":1}\n{\"a\":2}\n".to_vec());
    }
}
