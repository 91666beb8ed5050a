use std::path::PathBuf;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_ROOT: &str = "dialogue_interactions";
/// ~4k-token context window leaves room for roughly this many characters.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// Settings sent with every generation request.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub num_ctx: u32,
    /// Ask the service for JSON-constrained output.
    pub json_format: bool,
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            num_ctx: 4096,
            json_format: true,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root_dir: PathBuf,
    /// Only this movie folder; `None` processes every movie.
    pub movie: Option<String>,
    pub max_context_chars: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT),
            movie: None,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

impl RunConfig {
    pub fn includes(&self, movie: &str) -> bool {
        self.movie.as_deref().map_or(true, |m| m == movie)
    }
}
