//! Offline Intent Responder: canned replies for the chat path when no model answers.
//!
//! Rules are checked top to bottom with case-insensitive substring matching and the first
//! hit wins, so a credential warning is never masked by a greeting in the same message.

/// Recognized chat intents, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CredentialRequest,
    ScamReport,
    SafetyCheck,
    Identity,
    Greeting,
    Unknown,
}

struct Rule {
    intent: Intent,
    needles: &'static [&'static str],
}

// "opt" is a common misspelling of OTP in user messages.
const RULES: &[Rule] = &[
    Rule { intent: Intent::CredentialRequest, needles: &["opt", "otp", "pin", "cvv"] },
    Rule { intent: Intent::ScamReport, needles: &["scam", "fraud", "police"] },
    Rule { intent: Intent::SafetyCheck, needles: &["safe", "verify", "check"] },
    Rule { intent: Intent::Identity, needles: &["who are you", "what is this"] },
    Rule { intent: Intent::Greeting, needles: &["hello", "hi", "namaste"] },
];

const CREDENTIAL_REPLY: &str = "⚠️ **Security Alert**: That is definitely a scam! \n\nNo bank or official will EVER ask for your OTP, PIN, or Password over the phone.\n\n**Action:** Hang up immediately. Do not share any code.";

const SCAM_REPLY: &str = "If you have lost money or suspect fraud:\n1. Call **1930** (Cybercrime Helpline) immediately.\n2. Report it on **cybercrime.gov.in**.\n3. Block your bank cards through your banking app.";

const SAFETY_REPLY: &str = "It is better to be safe than sorry. \n\nIf you are unsure about a call, **hang up** and call the organization back using the official number from their website (not the one they gave you).";

const IDENTITY_REPLY: &str = "Namaste! I am **RakshaVaani**, your AI assistant for voice security. I listen to call patterns to help protect you from potential scams.";

const GREETING_REPLY: &str =
    "Namaste! I am here to protect you. How can I help you regarding call security today?";

const REDUCED_CAPABILITY_REPLY: &str = "Namaste. I am currently operating in **Low Power Mode** (High Server Traffic). \n\nI can answer basic questions about OTPs, Fraud, and Safety right now. For complex queries, please wait 1 minute for my connection to restore.";

/// First matching intent, or `Unknown`.
pub fn detect_intent(input: &str) -> Intent {
    let lower = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|n| lower.contains(n)))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown)
}

pub fn reply_for(intent: Intent) -> &'static str {
    match intent {
        Intent::CredentialRequest => CREDENTIAL_REPLY,
        Intent::ScamReport => SCAM_REPLY,
        Intent::SafetyCheck => SAFETY_REPLY,
        Intent::Identity => IDENTITY_REPLY,
        Intent::Greeting => GREETING_REPLY,
        Intent::Unknown => REDUCED_CAPABILITY_REPLY,
    }
}

/// Always non-empty.
pub fn offline_reply(input: &str) -> &'static str {
    reply_for(detect_intent(input))
}
