#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use dialscore_rs::llm::Llm;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FakeLlm {
    // maps each prompt to the raw text the service would return
    pub handler: Box<dyn Fn(&str) -> String + Send + Sync>,
    pub calls: AtomicUsize,
}

impl FakeLlm {
    pub fn new(handler: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self { handler: Box::new(handler), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Llm for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.handler)(prompt))
    }
}

pub struct DownLlm;

#[async_trait]
impl Llm for DownLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("connection refused")
    }
}

pub fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

pub fn line(character: &str, dialogue: &str) -> Value {
    serde_json::json!({ "character": character, "dialogue": dialogue })
}
