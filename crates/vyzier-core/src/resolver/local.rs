//! Local rule-based resolver.
//!
//! Answers from canned templates chosen by keyword. Rules are checked in the
//! order of [`TOPIC_RULES`]; the first rule with a keyword contained in the
//! lowercased user text wins, so "hashtag strategy" resolves as a hashtag
//! question. Text matching no rule gets [`CLARIFYING_TEMPLATE`].

use tokio::time::sleep;
use tracing::debug;

use vyzier_types::error::NetworkError;
use vyzier_types::message::Message;

use super::latency::{LatencyModel, RandomLatency};
use super::provider::ResponseResolver;

/// Topic recognized by the local resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Caption,
    Hashtag,
    Strategy,
    Analytics,
}

/// One keyword rule: any keyword match selects the template.
#[derive(Debug)]
pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub template: &'static str,
}

/// Keyword rules in priority order. Earlier rules win ties.
pub const TOPIC_RULES: [TopicRule; 4] = [
    TopicRule {
        topic: Topic::Caption,
        keywords: &["caption"],
        template: CAPTION_TEMPLATE,
    },
    TopicRule {
        topic: Topic::Hashtag,
        keywords: &["hashtag"],
        template: HASHTAG_TEMPLATE,
    },
    TopicRule {
        topic: Topic::Strategy,
        keywords: &["strategy", "plan"],
        template: STRATEGY_TEMPLATE,
    },
    TopicRule {
        topic: Topic::Analytics,
        keywords: &["analytics", "performance"],
        template: ANALYTICS_TEMPLATE,
    },
];

pub const CAPTION_TEMPLATE: &str = "✍️ Here are three caption options:\n\n\
1. \"Small changes, big impact. Which one are you trying this week? 👇\"\n\
2. \"Saved you a spot in the behind-the-scenes. Swipe to see how it's made ✨\"\n\
3. \"POV: you finally found the thing you've been searching for.\"\n\n\
Want me to tailor these to a specific platform or tone?";

pub const HASHTAG_TEMPLATE: &str = "#️⃣ Here's a balanced hashtag set:\n\n\
- **Broad reach:** #SmallBusiness #ContentCreator #MarketingTips\n\
- **Niche:** #SustainableFashion #SlowFashion #EcoFriendly\n\
- **Community:** #ShopSmall #MadeWithLove\n\n\
Mix 3-5 broad tags with 5-8 niche ones and rotate them weekly. Which platform is this for?";

pub const STRATEGY_TEMPLATE: &str = "🎯 Let's build your plan:\n\n\
1. **Goal:** pick one primary metric (awareness, engagement, or sales)\n\
2. **Pillars:** 3 recurring content themes your audience cares about\n\
3. **Cadence:** 3-4 posts per week, peak hours 6-9pm\n\
4. **Review:** check what worked every Friday and double down\n\n\
What's your main goal right now?";

pub const ANALYTICS_TEMPLATE: &str = "📊 Here's how to read your numbers:\n\n\
- **Reach dropping?** Post timing or format fatigue; test Reels or carousels\n\
- **Low saves/shares?** Content is entertaining but not useful; add takeaways\n\
- **High reach, low follows?** Strengthen your profile and call to action\n\n\
Share your last 30 days of metrics and I'll pinpoint what to post next.";

pub const CLARIFYING_TEMPLATE: &str = "Great question! To give you the best advice, could you tell me:\n\n\
- Which platform are you focusing on?\n\
- Who is your target audience?\n\
- What goal matters most right now?";

/// Find the first rule whose keyword appears in `text` (case-insensitive).
pub fn match_topic(text: &str) -> Option<&'static TopicRule> {
    let lowered = text.to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
}

/// Template text for `text`, falling back to the clarifying question.
pub fn compose_reply(text: &str) -> &'static str {
    match_topic(text).map_or(CLARIFYING_TEMPLATE, |rule| rule.template)
}

/// Rule-based resolver used when no backend is configured.
///
/// Never fails; the simulated latency comes from the injected `LatencyModel`.
#[derive(Debug, Default)]
pub struct LocalRuleResolver<L: LatencyModel = RandomLatency> {
    latency: L,
}

impl<L: LatencyModel> LocalRuleResolver<L> {
    pub fn new(latency: L) -> Self {
        Self { latency }
    }
}

impl<L: LatencyModel> ResponseResolver for LocalRuleResolver<L> {
    fn name(&self) -> &str {
        "local"
    }

    async fn resolve(&self, user_text: &str, history: &[Message]) -> Result<Message, NetworkError> {
        let delay = self.latency.next_delay();
        let topic = match_topic(user_text).map(|rule| rule.topic);
        debug!(?topic, delay_ms = delay.as_millis() as u64, history = history.len(), "Resolving locally");

        sleep(delay).await;
        Ok(Message::assistant(compose_reply(user_text)))
    }
}
