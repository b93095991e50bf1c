//! Fluent conversation builder with prefill modes.
//!
//! [`PromptBuilder`] collects messages with chained calls and renders them
//! with a [`Prefill`] that decides how the prompt ends: closed, opening a
//! fresh assistant turn, or already inside a partially written one.
//!
//! # Example
//!
//! ```
//! use chatfmt::builder::{Prefill, PromptBuilder};
//! use chatfmt::{Renderer, TemplateProfile};
//!
//! let renderer = Renderer::new(TemplateProfile::glm45());
//! let prompt = PromptBuilder::new(true)
//!     .user("Is 97 prime?")
//!     .build(
//!         &renderer,
//!         Prefill::PartialReasoning {
//!             reasoning_content: "Let me check divisibility...".into(),
//!         },
//!     )
//!     .unwrap();
//!
//! assert!(prompt.as_str().ends_with("<|assistant|>\n<think>Let me check divisibility..."));
//! ```

use crate::render::continuation;
use crate::{Message, RenderError, RenderOptions, RenderedPrompt, Renderer};

/// How the rendered prompt ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Prefill {
    /// Render the conversation as-is.
    None,
    /// Open a new assistant turn (the generation prompt).
    #[default]
    Canonical,
    /// Start an assistant turn whose reasoning is still being written.
    PartialReasoning { reasoning_content: String },
    /// Start an assistant turn with finished reasoning and a partial answer.
    FullReasoning {
        reasoning_content: String,
        content: String,
    },
}

/// Builder for a conversation plus the thinking switch it renders with.
#[derive(Clone, Debug, Default)]
pub struct PromptBuilder {
    messages: Vec<Message>,
    enable_thinking: bool,
}

impl PromptBuilder {
    pub fn new(enable_thinking: bool) -> Self {
        Self {
            messages: Vec::new(),
            enable_thinking,
        }
    }

    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    pub fn assistant_with_reasoning(
        mut self,
        reasoning: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.messages
            .push(Message::assistant_with_reasoning(reasoning, content));
        self
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Render the collected messages, ending the prompt as `prefill` says.
    ///
    /// Reasoning prefills always render with thinking enabled, since their
    /// whole point is a visible reasoning block. The builder's own messages
    /// are left untouched.
    pub fn build(
        &self,
        renderer: &Renderer,
        prefill: Prefill,
    ) -> Result<RenderedPrompt, RenderError> {
        let options = RenderOptions::new().with_thinking(self.enable_thinking);
        match prefill {
            Prefill::None => renderer.render(&self.messages, &options),
            Prefill::Canonical => {
                renderer.render(&self.messages, &options.with_generation_prompt(true))
            }
            Prefill::PartialReasoning { reasoning_content } => {
                let mut messages = self.messages.clone();
                messages.push(Message::assistant_reasoning_only(reasoning_content));
                let options = options
                    .with_thinking(true)
                    .with_continue_final_message(true);
                let rendered = renderer.render(&messages, &options)?;
                let reopened = continuation::reopen_thinking(
                    rendered.into_string(),
                    &renderer.profile().thinking.close,
                );
                Ok(RenderedPrompt::from_continuation(reopened))
            }
            Prefill::FullReasoning {
                reasoning_content,
                content,
            } => {
                let mut messages = self.messages.clone();
                messages.push(Message::assistant_with_reasoning(reasoning_content, content));
                let options = options
                    .with_thinking(true)
                    .with_continue_final_message(true);
                renderer.render(&messages, &options)
            }
        }
    }
}
