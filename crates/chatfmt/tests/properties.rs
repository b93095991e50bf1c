//! Rendering invariants checked across both built-in profiles and a spread
//! of conversation shapes.

use chatfmt::prelude::*;
use chatfmt::render::continuation;

fn profiles() -> Vec<TemplateProfile> {
    vec![
        TemplateProfile::glm45(),
        TemplateProfile::chatml(),
        TemplateProfile::chatml().with_default_system(DefaultSystem::Substitute("Default.".into())),
        TemplateProfile::glm45().with_generation_thinking(GenerationThinking::CloseWhenDisabled),
    ]
}

fn all_options() -> Vec<RenderOptions> {
    let mut out = Vec::new();
    for generation in [false, true] {
        for thinking in [false, true] {
            for cont in [false, true] {
                out.push(
                    RenderOptions::new()
                        .with_generation_prompt(generation)
                        .with_thinking(thinking)
                        .with_continue_final_message(cont),
                );
            }
        }
    }
    out
}

/// Conversation shapes without any reasoning content.
fn plain_conversations() -> Vec<Vec<Message>> {
    vec![
        vec![],
        vec![Message::system("Be terse.")],
        vec![Message::user("Hi")],
        vec![
            Message::system("Be terse."),
            Message::user("Hi"),
            Message::assistant("Hello."),
        ],
        vec![
            Message::user("a"),
            Message::assistant(""),
            Message::user("b"),
        ],
        vec![
            Message::user("x"),
            Message::system("late"),
            Message::assistant("y\n"),
        ],
    ]
}

fn reasoning_conversations() -> Vec<Vec<Message>> {
    vec![
        vec![
            Message::user("Q"),
            Message::assistant_with_reasoning("SECRET-R1", "A"),
        ],
        vec![
            Message::user("Q"),
            Message::assistant_reasoning_only("SECRET-R2"),
            Message::user("Q2"),
        ],
        vec![
            Message::user("Q"),
            Message::assistant_with_reasoning("", "A"),
        ],
    ]
}

fn all_conversations() -> Vec<Vec<Message>> {
    let mut all = plain_conversations();
    all.extend(reasoning_conversations());
    all
}

#[test]
fn rendering_is_deterministic() {
    for profile in profiles() {
        let renderer = Renderer::new(profile);
        for messages in all_conversations() {
            for options in all_options() {
                assert_eq!(
                    renderer.render(&messages, &options),
                    renderer.render(&messages, &options)
                );
            }
        }
    }
}

#[test]
fn rendering_does_not_mutate_inputs() {
    let renderer = Renderer::default();
    for messages in all_conversations() {
        for options in all_options() {
            let before_messages = messages.clone();
            let before_options = options;
            let _ = renderer.render(&messages, &options);
            assert_eq!(messages, before_messages);
            assert_eq!(options, before_options);
        }
    }
}

#[test]
fn thinking_flag_is_inert_without_reasoning_or_generation_prompt() {
    for profile in profiles() {
        let renderer = Renderer::new(profile);
        for messages in plain_conversations() {
            for cont in [false, true] {
                let base = RenderOptions::new().with_continue_final_message(cont);
                assert_eq!(
                    renderer.render(&messages, &base.with_thinking(false)),
                    renderer.render(&messages, &base.with_thinking(true)),
                    "profile {} messages {messages:?}",
                    renderer.profile().name
                );
            }
        }
    }
}

#[test]
fn generation_prompt_and_continuation_are_exclusive() {
    for profile in profiles() {
        let renderer = Renderer::new(profile);
        for messages in all_conversations() {
            for thinking in [false, true] {
                let options = RenderOptions::new()
                    .with_generation_prompt(true)
                    .with_continue_final_message(true)
                    .with_thinking(thinking);
                assert_eq!(
                    renderer.render(&messages, &options),
                    Err(RenderError::ConfigConflict)
                );
            }
        }
    }
}

#[test]
fn reasoning_is_suppressed_when_thinking_disabled() {
    for profile in profiles() {
        let renderer = Renderer::new(profile.clone());
        for messages in reasoning_conversations() {
            for generation in [false, true] {
                let options = RenderOptions::new().with_generation_prompt(generation);
                let out = renderer.render(&messages, &options).unwrap();
                assert!(!out.as_str().contains("SECRET"), "{out}");

                let on = renderer
                    .render(&messages, &options.with_thinking(true))
                    .unwrap();
                for secret in ["SECRET-R1", "SECRET-R2"] {
                    let wrapped = format!(
                        "{}{secret}{}",
                        profile.thinking.open, profile.thinking.close
                    );
                    let present = messages
                        .iter()
                        .any(|m| m.reasoning_content.as_deref() == Some(secret));
                    assert_eq!(on.as_str().contains(&wrapped), present);
                }
            }
        }
    }
}

/// The continued prompt plus the assistant close delimiter is the plain
/// render of the same conversation with the final content's trailing
/// whitespace removed. Profiles that trim assistant content render that
/// identically to the untouched conversation.
#[test]
fn continuation_plus_close_equals_plain_render() {
    let mut conversations: Vec<Vec<Message>> = all_conversations()
        .into_iter()
        .filter(|m| m.last().is_some_and(|last| last.role == Role::Assistant))
        .collect();
    let reasoning_only = vec![Message::user("q"), Message::assistant_reasoning_only("r")];
    conversations.push(vec![Message::assistant("solo")]);
    conversations.push(vec![Message::assistant(" padded \n\t")]);
    conversations.push(reasoning_only);

    for profile in profiles() {
        let renderer = Renderer::new(profile.clone());
        for messages in &conversations {
            let mut trimmed = messages.clone();
            if let Some(last) = trimmed.last_mut() {
                *last = continuation::trim_trailing_whitespace(last);
            }
            for thinking in [false, true] {
                let plain = RenderOptions::new().with_thinking(thinking);
                let full = renderer.render(&trimmed, &plain).unwrap();
                let open = renderer
                    .render(messages, &plain.with_continue_final_message(true))
                    .unwrap();
                assert_eq!(
                    format!("{open}{}", profile.assistant.close),
                    full.as_str(),
                    "profile {}",
                    profile.name
                );

                if profile.trim_assistant_content {
                    let untouched = renderer.render(messages, &plain).unwrap();
                    assert_eq!(full, untouched, "profile {}", profile.name);
                }
            }
        }
    }
}

#[test]
fn continued_prompt_does_not_end_in_whitespace() {
    let messages = [
        Message::user("Explain your reasoning."),
        Message::assistant("Here it is:\n\n<thinking>\n \t"),
    ];
    let options = RenderOptions::new().with_continue_final_message(true);
    for profile in profiles() {
        let renderer = Renderer::new(profile.clone());
        let out = renderer.render(&messages, &options).unwrap();
        assert!(
            out.as_str().ends_with("Here it is:\n\n<thinking>"),
            "profile {}: {out:?}",
            profile.name
        );
    }
}

#[test]
fn continuation_requires_a_final_assistant_message() {
    let renderer = Renderer::default();
    let options = RenderOptions::new().with_continue_final_message(true);
    assert_eq!(renderer.render(&[], &options), Err(RenderError::NoMessages));
    assert_eq!(
        renderer.render(&[Message::user("hi")], &options),
        Err(RenderError::LastMessageNotAssistant { role: Role::User })
    );
}

#[test]
fn scenario_single_system_message() {
    for profile in profiles() {
        let renderer = Renderer::new(profile.clone());
        let out = renderer
            .render(&[Message::system("Only me.")], &RenderOptions::new())
            .unwrap();
        let expected = format!(
            "{}{}{}Only me.{}",
            profile.preamble,
            profile.system.open,
            profile.system.content_prefix,
            profile.system.close
        );
        assert_eq!(out.as_str(), expected);
    }
}

#[test]
fn scenario_empty_conversation_with_generation_prompt() {
    for profile in profiles() {
        let renderer = Renderer::new(profile.clone());
        let out = renderer
            .render(&[], &RenderOptions::new().with_generation_prompt(true))
            .unwrap();
        let mut expected = format!("{}{}", profile.preamble, profile.generation_prompt);
        if profile.generation_thinking == GenerationThinking::CloseWhenDisabled {
            expected.push_str(&profile.thinking.open);
            expected.push_str(&profile.thinking.close);
        }
        assert_eq!(out.as_str(), expected);
    }
}

#[test]
fn scenario_empty_reasoning_renders_empty_block() {
    let messages = [
        Message::user("Hello!"),
        Message::assistant_with_reasoning("", "Hi there!"),
    ];
    let options = RenderOptions::new().with_thinking(true);

    let out = render(&messages, &options).unwrap();
    assert!(out.as_str().contains("<think></think>"));

    let chatml = Renderer::new(TemplateProfile::chatml())
        .render(&messages, &options)
        .unwrap();
    let tail = "<think>\n\n</think>\n\nHi there!<|im_end|>\n";
    assert!(chatml.as_str().ends_with(tail));
}

#[test]
fn scenario_reasoning_only_assistant_is_not_an_error() {
    let messages = [
        Message::user("Think."),
        Message::assistant_reasoning_only("hmm"),
    ];
    let options = RenderOptions::new().with_thinking(true);
    let out = Renderer::new(TemplateProfile::chatml())
        .render(&messages, &options)
        .unwrap();
    assert_eq!(
        out.as_str(),
        "<|im_start|>user\nThink.<|im_end|>\n<|im_start|>assistant\n<think>\nhmm\n</think>\n\n<|im_end|>\n"
    );
}

#[test]
fn custom_profile_from_file_drives_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.json");
    std::fs::write(
        &path,
        r#"{
            "name": "plain",
            "system": {"open": "S: ", "close": "\n"},
            "user": {"open": "U: ", "close": "\n"},
            "assistant": {"open": "A: ", "close": "\n"},
            "thinking": {"open": "(", "close": ") "},
            "generation_prompt": "A: ",
            "generation_thinking": "off"
        }"#,
    )
    .unwrap();

    let renderer = Renderer::new(TemplateProfile::from_file(&path).unwrap());
    let messages = [
        Message::user("2+2?"),
        Message::assistant_with_reasoning("add", "4"),
        Message::user("3+3?"),
    ];
    let options = RenderOptions::new()
        .with_generation_prompt(true)
        .with_thinking(true);
    let out = renderer.render(&messages, &options).unwrap();
    assert_eq!(out.as_str(), "U: 2+2?\nA: (add) 4\nU: 3+3?\nA: ");
}
