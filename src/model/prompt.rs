//! Interview prompt construction.
//!
//! Three prompts drive a screening call: the fixed bootstrap instruction
//! that opens the interview, the per-turn prompt carrying accumulated
//! dialogue context, and the post-call grading prompt.

use crate::config::InterviewConfig;
use crate::session::{Role, TranscriptTurn};

/// Opening instruction for the bootstrap invocation. Runs once, without
/// conversation history.
pub fn bootstrap_instruction(interview: &InterviewConfig) -> String {
    format!(
        "You are {agent}, a recruiter at {company}. Start the phone screening \
         by introducing yourself, explaining the process, and asking the \
         candidate's name.",
        agent = interview.agent_name,
        company = interview.company,
    )
}

/// Per-turn prompt: persona, accumulated dialogue, and the candidate's
/// latest utterance.
pub fn turn_prompt(
    interview: &InterviewConfig,
    history: &[TranscriptTurn],
    utterance: &str,
) -> String {
    let mut context = String::new();
    for turn in history {
        let speaker = match turn.role {
            Role::Caller => "Candidate",
            Role::Agent => "Interviewer",
        };
        context.push_str(speaker);
        context.push_str(": ");
        context.push_str(&turn.text);
        context.push('\n');
    }

    format!(
        "Act like an HR recruiter conducting a phone interview.\n\
         Job Role: {role}\n\
         Resume: {resume}\n\
         Ask relevant questions, listen to answers, and acknowledge.\n\
         Conversation so far:\n{context}\
         Candidate said: {utterance}\n\
         Respond appropriately.",
        role = interview.job_role,
        resume = interview.resume_summary,
    )
}

/// Grading prompt over the completed transcript, used by the scoring
/// handoff after the call ends.
pub fn grading_prompt(transcript: &str) -> String {
    format!(
        "Grade this candidate on a scale of 1-10 based on the phone \
         screening transcript below:\n\
         Transcript:\n{transcript}\n\
         Return the final score and detailed comments.",
    )
}
