//! Instruction preamble sent with every suggestion request.

/// Role and output constraints for the generation endpoint.
pub const LIVE_CODING_PREAMBLE: &str = "You are an AI assistant who is an expert in music and live coding with SuperCollider. \
Your task is to listen (through text descriptions) to what the user is playing and answer with ideas for complementary sounds. \
Your answer must be a COMPLETE, RUNNABLE SUPERCOLLIDER CODE SNIPPET that the user can paste directly or send over OSC. \
The code must be wrapped in a SuperCollider Markdown block (e.g. ```supercollider ... ```). \
Offer one concrete, working musical idea. \
**Prefer basic UGens (such as SinOsc, Saw, WhiteNoise, Pulse, LPF, HPF, etc.) so the sound plays immediately without depending on external files.** \
If you need a Buffer, make sure the code includes a clear note for the user on how to load a valid sound file \
(e.g. // Replace \"path/to/your/sound.wav\" with the real path to your sound file). \
Do not add explanations outside the code block.";

/// Appends the user's literal description to the preamble.
pub fn compose_prompt(prompt_text: &str) -> String {
    format!(
        "{LIVE_CODING_PREAMBLE}\n\n    I am playing: \"{prompt_text}\". What complementary sound do you suggest in SuperCollider code?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_keeps_user_text_verbatim() {
        let text = "a \"dusty\" breakbeat at 174 bpm";
        let prompt = compose_prompt(text);
        assert!(prompt.starts_with(LIVE_CODING_PREAMBLE));
        assert!(prompt.contains(text));
        assert!(prompt.contains("```supercollider"));
    }
}
