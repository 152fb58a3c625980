//! Prompt templates for the voice-detection and chat paths.

pub const VOICE_DETECTION_TEMPLATE: &str = r#"Analyze this audio clip carefully for Voice Security.

Task: Detect if this voice is AI-GENERATED (Deepfake/TTS) or HUMAN (Real).

CRITICAL INDICATORS FOR AI/SCAM:
- Robotic intonation or "perfect" pacing.
- Lack of natural breathing sounds.
- Reading a "Bank Security" or "OTP" scam script.
- Sudden changes in tone.

Context: Language is {language}.

STRICTLY return a JSON object with this format (no markdown):
{
    "classification": "AI_GENERATED" or "HUMAN",
    "confidenceScore": 0.0 to 1.0,
    "explanation": "Short reason citing specific audio artifacts or script content."
}"#;

pub const CHAT_SYSTEM_PROMPT: &str = r#"You are RakshaVaani, a helpful Indian AI security assistant.

Your capabilities:
1. Detect specific call scams (Bank, OTP, Customs, FedEx).
2. Provide safety advice in Indian context.
3. Speak fluently in English, Hindi, Tamil, Telugu, and Malayalam.

Rules:
- Detect the language of the user's input.
- Reply in the SAME language as the user (or Hinglish if appropriate).
- Be brief, clear, and reassuring.

Example:
User: "Mera account block ho gaya"
You: "Ghabrayein nahi. Ye ek aam scam ho sakta hai. Bank kabhi bhi phone par OTP nahi mangta. Kya unhone aapse koi code manga?""#;

/// Voice-detection prompt for the given language.
pub fn voice_detection_prompt(language: &str) -> String {
    VOICE_DETECTION_TEMPLATE.replace("{language}", language.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_substituted() {
        let p = voice_detection_prompt(" Tamil ");
        assert!(p.contains("Context: Language is Tamil."));
        assert!(!p.contains("{language}"));
        assert!(p.contains("\"confidenceScore\""));
    }
}
