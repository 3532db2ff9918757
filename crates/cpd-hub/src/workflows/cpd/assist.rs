//! Advisory AI boundary for the facilitator form.
//!
//! The model only ever suggests; the classification flags on an event are
//! set by people, and nothing here writes back into the workflow.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::classification::CpdStatus;

/// Free-text completion seam. Implementations wrap whichever model the
/// deployment has access to.
pub trait AssistClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, AssistError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("assist backend unavailable: {0}")]
    Unavailable(String),
}

/// A status suggestion with the model's one-line rationale. `suggested`
/// is `None` when the reply named no recognizable classification.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSuggestion {
    pub suggested: Option<CpdStatus>,
    pub rationale: String,
}

/// Builds classification prompts and interprets the replies.
pub struct StatusAdvisor<C> {
    client: Arc<C>,
}

impl<C> StatusAdvisor<C>
where
    C: AssistClient + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Ask the model how an event should be classified. The full reply is
    /// kept as the rationale even when no status could be parsed from it.
    pub fn suggest_status(
        &self,
        title: &str,
        description: &str,
        audience: &str,
    ) -> Result<StatusSuggestion, AssistError> {
        let prompt = status_prompt(title, description, audience);
        let reply = self.client.complete(&prompt)?;
        let suggested = parse_status_reply(&reply);
        if suggested.is_none() {
            warn!(title, "assist reply named no classification");
        }
        Ok(StatusSuggestion {
            suggested,
            rationale: reply,
        })
    }
}

fn status_prompt(title: &str, description: &str, audience: &str) -> String {
    format!(
        "Analyze this CPD event for Co-op Academies Trust.\n\
         Title: {title}\n\
         Description: {description}\n\
         Audience: {audience}\n\
         \n\
         Based on the description, suggest if this should be:\n\
         - STATUTORY (Legal requirement like Safeguarding)\n\
         - MANDATORY (Trust policy requirement)\n\
         - TRUST PRIORITY (Strategic goal)\n\
         - OPTIONAL (General interest)\n\
         \n\
         Provide a 1 sentence rationale."
    )
}

/// Best-effort mapping of a free-text reply onto a status. The earliest
/// keyword in the reply wins, so a rationale that mentions a second
/// classification in passing does not override the headline suggestion.
fn parse_status_reply(reply: &str) -> Option<CpdStatus> {
    let upper = reply.to_uppercase();
    let candidates = [
        ("STATUTORY", CpdStatus::Statutory),
        ("MANDATORY", CpdStatus::Mandatory),
        ("TRUST PRIORITY", CpdStatus::Priority),
        ("OPTIONAL", CpdStatus::Optional),
    ];
    candidates
        .into_iter()
        .filter_map(|(keyword, status)| upper.find(keyword).map(|at| (at, status)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, status)| status)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedClient(&'static str);

    impl AssistClient for CannedClient {
        fn complete(&self, _: &str) -> Result<String, AssistError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn parses_the_earliest_classification_keyword() {
        assert_eq!(
            parse_status_reply("STATUTORY - this is a legal safeguarding duty, not optional."),
            Some(CpdStatus::Statutory)
        );
        assert_eq!(
            parse_status_reply("This looks like a Trust Priority supporting the strategy."),
            Some(CpdStatus::Priority)
        );
        assert_eq!(parse_status_reply("I cannot tell."), None);
    }

    #[test]
    fn advisor_keeps_the_full_reply_as_rationale() {
        let advisor = StatusAdvisor::new(Arc::new(CannedClient(
            "MANDATORY: trust policy requires annual completion.",
        )));
        let suggestion = advisor
            .suggest_status("Data Protection Refresher", "Annual GDPR update", "All staff")
            .unwrap();
        assert_eq!(suggestion.suggested, Some(CpdStatus::Mandatory));
        assert!(suggestion.rationale.contains("trust policy"));
    }

    #[test]
    fn unparseable_reply_is_still_returned_as_advice() {
        let advisor = StatusAdvisor::new(Arc::new(CannedClient("It depends on the context.")));
        let suggestion = advisor
            .suggest_status("Coaching Skills", "Peer coaching intro", "Teachers")
            .unwrap();
        assert_eq!(suggestion.suggested, None);
        assert!(!suggestion.rationale.is_empty());
    }
}
