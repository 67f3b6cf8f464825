//! Scripted [`CompletionClient`] for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::CompletionClient;

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
    /// Panics inside `complete`, standing in for a bug in the client.
    Panic(String),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Reply::Fail(message.into())
    }

    pub fn panic(message: impl Into<String>) -> Self {
        Reply::Panic(message.into())
    }
}

/// Answers prompts from a fixed script, in order. Once the script runs out
/// every call fails.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => anyhow::bail!(message),
            Some(Reply::Panic(message)) => panic!("{message}"),
            None => anyhow::bail!("script exhausted"),
        }
    }
}
