// ABOUTME: robots.txt evaluation over an already fetched body.
// ABOUTME: Answers whether a URL may be crawled and counts the rules that apply to our agent.

use robotstxt::{parse_robotstxt, DefaultMatcher, RobotsParseHandler};

/// Product token used when no user agent is configured.
pub const DEFAULT_USER_AGENT: &str = "webtools";

/// A parsed robots.txt file, evaluated for one user agent.
///
/// Matching follows the de facto standard: the most specific (longest)
/// matching rule wins, `Allow` wins ties, and groups naming the agent replace
/// the `*` group. An empty or unparseable body allows everything.
#[derive(Debug, Clone)]
pub struct RobotsTxt {
    body: String,
    user_agent: String,
    groups: Vec<Group>,
    sitemaps: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct Group {
    agents: Vec<String>,
    rules: usize,
}

impl RobotsTxt {
    pub fn parse(body: &str) -> Self {
        let mut collector = Collector::default();
        parse_robotstxt(body, &mut collector);

        let robots = Self {
            body: body.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            groups: collector.groups,
            sitemaps: collector.sitemaps,
        };
        tracing::debug!(
            user_agent = %robots.user_agent,
            rules = robots.applicable_rules(),
            "parsed robots.txt"
        );
        robots
    }

    /// Evaluates rules for `user_agent` instead of [`DEFAULT_USER_AGENT`].
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// False only when a rule disallows `url` for the configured agent.
    pub fn is_url_allowed(&self, url: &str) -> bool {
        let mut matcher = DefaultMatcher::default();
        let allowed = matcher.one_agent_allowed_by_robots(&self.body, &self.user_agent, url);
        tracing::trace!(url, allowed, "robots.txt check");
        allowed
    }

    /// Number of `Allow`/`Disallow` lines in the groups that apply to the agent.
    ///
    /// Groups naming the agent take precedence; the `*` groups count only when
    /// no group names it.
    pub fn applicable_rules(&self) -> usize {
        let named: Vec<&Group> = self
            .groups
            .iter()
            .filter(|g| g.agents.iter().any(|a| names_agent(a, &self.user_agent)))
            .collect();
        if !named.is_empty() {
            return named.iter().map(|g| g.rules).sum();
        }
        self.groups
            .iter()
            .filter(|g| g.agents.iter().any(|a| is_global(a)))
            .map(|g| g.rules)
            .sum()
    }

    /// `Sitemap:` locations listed in the file, in order.
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

fn is_global(agent: &str) -> bool {
    agent.trim_start().starts_with('*')
}

// Compares product tokens: `FooBot/2.1` names the agent `foobot`.
fn names_agent(agent: &str, user_agent: &str) -> bool {
    let token: String = agent
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '-' || *c == '_')
        .collect();
    !token.is_empty() && token.eq_ignore_ascii_case(user_agent)
}

/// Groups consecutive `User-agent` lines with the rules that follow them.
#[derive(Default)]
struct Collector {
    groups: Vec<Group>,
    reading_agents: bool,
    sitemaps: Vec<String>,
}

impl Collector {
    fn add_rule(&mut self) {
        self.reading_agents = false;
        if let Some(group) = self.groups.last_mut() {
            group.rules += 1;
        }
    }
}

impl RobotsParseHandler for Collector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, user_agent: &str) {
        if !self.reading_agents {
            self.groups.push(Group::default());
            self.reading_agents = true;
        }
        if let Some(group) = self.groups.last_mut() {
            group.agents.push(user_agent.to_string());
        }
    }

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {
        self.add_rule();
    }

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {
        self.add_rule();
    }

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.sitemaps.push(value.to_string());
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}
