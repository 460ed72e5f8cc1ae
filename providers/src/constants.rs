//! Constants for adapter implementations

/// Default Anthropic base URL
pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Default Anthropic model
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default Ollama base URL
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default Ollama model
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2";

/// Default Bedrock region
pub const BEDROCK_DEFAULT_REGION: &str = "us-east-1";

/// Default Bedrock model
pub const BEDROCK_DEFAULT_MODEL: &str = "anthropic.claude-3-5-sonnet-20241022-v2:0";

/// Anthropic-on-Bedrock dialect version
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Default OpenAI base URL
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default OpenAI model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

/// Default Groq base URL
pub const GROQ_DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";

/// Default Groq model
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default Mistral base URL
pub const MISTRAL_DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// Default Mistral model
pub const MISTRAL_DEFAULT_MODEL: &str = "mistral-large-latest";

/// Default Gemini base URL
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Secret-store keys, one namespace per backend
pub mod keys {
    /// Anthropic API key
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
    /// Anthropic endpoint override
    pub const ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";
    /// Ollama endpoint override
    pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
    /// AWS access key id for Bedrock
    pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    /// AWS secret access key for Bedrock
    pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
    /// AWS region override for Bedrock
    pub const AWS_REGION: &str = "AWS_REGION";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Gemini endpoint override
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// OpenAI API key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// OpenAI endpoint override
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Groq API key
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    /// Groq endpoint override
    pub const GROQ_BASE_URL: &str = "GROQ_BASE_URL";
    /// Mistral API key
    pub const MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";
    /// Mistral endpoint override
    pub const MISTRAL_BASE_URL: &str = "MISTRAL_BASE_URL";
}
