//! JAAS login configuration parser

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use zkauth_common::config::PropertySource;
use zkauth_common::error::LoginConfigError;
use zkauth_common::metrics;

use super::{ControlFlag, LoginConfigParser, LoginConfiguration, LoginModuleEntry};

#[derive(Parser)]
#[grammar = "jaas/jaas.pest"]
struct JaasGrammar;

/// Parser for the standard JAAS `ConfigFile` format
#[derive(Clone, Default)]
pub struct JaasFileParser {
    /// Source for `${...}` expansion in option values; values stay verbatim when unset
    properties: Option<Arc<dyn PropertySource>>,
}

impl JaasFileParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `${name}` references in option values from `properties`
    #[must_use]
    pub fn with_properties(mut self, properties: Arc<dyn PropertySource>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Parse a document held in memory
    pub fn parse_str(&self, input: &str) -> Result<LoginConfiguration, LoginConfigError> {
        let document = JaasGrammar::parse(Rule::document, input)
            .map_err(syntax_error)?
            .next()
            .ok_or_else(|| LoginConfigError::Syntax {
                line: 1,
                column: 1,
                message: "empty parse tree".to_string(),
            })?;

        let mut config = LoginConfiguration::default();
        for pair in document.into_inner() {
            if pair.as_rule() != Rule::context {
                continue;
            }
            let (name, entries) = self.build_context(pair)?;
            config.insert(name, entries)?;
        }

        metrics::record_login_config_parsed(config.len());
        Ok(config)
    }

    fn build_context(
        &self,
        pair: Pair<'_, Rule>,
    ) -> Result<(String, Vec<LoginModuleEntry>), LoginConfigError> {
        let mut inner = pair.into_inner();
        let name = inner.next().map(value_text).unwrap_or_default();

        let entries = inner
            .filter(|p| p.as_rule() == Rule::entry)
            .map(|p| self.build_entry(p))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(context = %name, modules = entries.len(), "Parsed login context");
        Ok((name, entries))
    }

    fn build_entry(&self, pair: Pair<'_, Rule>) -> Result<LoginModuleEntry, LoginConfigError> {
        let (line, column) = pair.line_col();
        let mut login_module = String::new();
        let mut flag = None;
        let mut options = BTreeMap::new();

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::value => login_module = value_text(part),
                Rule::flag => flag = part.as_str().parse::<ControlFlag>().ok(),
                Rule::option => {
                    let mut kv = part.into_inner();
                    let key = kv.next().map(|k| k.as_str().to_string()).unwrap_or_default();
                    let value = kv.next().map(value_text).unwrap_or_default();
                    options.insert(key, self.expand(&value)?);
                }
                _ => {}
            }
        }

        let flag = flag.ok_or_else(|| LoginConfigError::Syntax {
            line,
            column,
            message: format!("missing control flag for {login_module}"),
        })?;

        Ok(LoginModuleEntry {
            login_module,
            flag,
            options,
        })
    }

    fn expand(&self, value: &str) -> Result<String, LoginConfigError> {
        match &self.properties {
            Some(props) => expand_properties(value, props.as_ref()),
            None => Ok(value.to_string()),
        }
    }
}

impl LoginConfigParser for JaasFileParser {
    fn parse(&self, path: &Path) -> Result<LoginConfiguration, LoginConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }
}

impl std::fmt::Debug for JaasFileParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JaasFileParser")
            .field("expand_properties", &self.properties.is_some())
            .finish()
    }
}

fn syntax_error(e: pest::error::Error<Rule>) -> LoginConfigError {
    let (line, column) = match e.line_col {
        LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
    };
    let e = e.renamed_rules(|rule| {
        match rule {
            Rule::word => "identifier",
            Rule::quoted | Rule::quoted_inner => "quoted string",
            Rule::value => "identifier or quoted string",
            Rule::flag => "control flag (required, requisite, sufficient, optional)",
            Rule::option => "option",
            Rule::entry => "login module entry",
            Rule::context => "login context",
            Rule::EOI => "end of input",
            _ => "token",
        }
        .to_string()
    });
    LoginConfigError::Syntax {
        line,
        column,
        message: e.variant.message().into_owned(),
    }
}

/// Text of a `value` pair with quotes removed and escapes applied
fn value_text(pair: Pair<'_, Rule>) -> String {
    let Some(inner) = pair.into_inner().next() else {
        return String::new();
    };
    match inner.as_rule() {
        Rule::quoted => inner
            .into_inner()
            .next()
            .map(|q| unescape(q.as_str()))
            .unwrap_or_default(),
        _ => inner.as_str().to_string(),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Replace `${name}` with property values; `${/}` is the path separator.
///
/// An unterminated `${` is kept as-is.
fn expand_properties(value: &str, props: &dyn PropertySource) -> Result<String, LoginConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let key = &after[..end];
        if key == "/" {
            out.push(std::path::MAIN_SEPARATOR);
        } else {
            let resolved = props
                .get(key)
                .ok_or_else(|| LoginConfigError::UnresolvedProperty(key.to_string()))?;
            out.push_str(&resolved);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkauth_common::config::MapProperties;

    const KAFKA_JAAS: &str = r#"
// Broker and ZooKeeper client credentials
KafkaServer {
    org.apache.kafka.common.security.plain.PlainLoginModule required
    username="admin"
    password="admin-secret";
};

/* ZooKeeper client */
Client {
    org.apache.zookeeper.server.auth.DigestLoginModule Required
        username=kafka
        password="kafka \"secret\"";
    com.sun.security.auth.module.Krb5LoginModule optional useKeyTab=true;
};
"#;

    #[test]
    fn test_parse_contexts() {
        let config = JaasFileParser::new().parse_str(KAFKA_JAAS).unwrap();

        assert_eq!(config.context_names().collect::<Vec<_>>(), ["KafkaServer", "Client"]);

        let client = config.entries("Client").unwrap();
        assert_eq!(client.len(), 2);
        assert_eq!(
            client[0].login_module,
            "org.apache.zookeeper.server.auth.DigestLoginModule"
        );
        assert_eq!(client[0].flag, ControlFlag::Required);
        assert_eq!(client[0].option("username"), Some("kafka"));
        assert_eq!(client[0].option("password"), Some("kafka \"secret\""));
        assert_eq!(client[1].flag, ControlFlag::Optional);
        assert_eq!(client[1].option("useKeyTab"), Some("true"));
    }

    #[test]
    fn test_empty_document() {
        let config = JaasFileParser::new().parse_str("  # nothing here\n").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_empty_context_parses_but_is_absent() {
        let config = JaasFileParser::new().parse_str("Client { };").unwrap();
        assert_eq!(config.len(), 1);
        assert!(config.entries("Client").is_none());
    }

    #[test]
    fn test_invalid_flag() {
        let err = JaasFileParser::new()
            .parse_str("Client {\n  a.B mandatory;\n};")
            .unwrap_err();
        match err {
            LoginConfigError::Syntax { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("control flag"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_semicolons() {
        let parser = JaasFileParser::new();
        assert!(parser.parse_str("Client { a.B required; }").is_err());
        assert!(parser.parse_str("Client { a.B required };").is_err());
    }

    #[test]
    fn test_unterminated_comment() {
        let err = JaasFileParser::new()
            .parse_str("/* Client { a.B required; };")
            .unwrap_err();
        assert!(matches!(err, LoginConfigError::Syntax { .. }));
    }

    #[test]
    fn test_duplicate_context() {
        let err = JaasFileParser::new()
            .parse_str("Client { a.B required; };\nClient { c.D optional; };")
            .unwrap_err();
        assert!(matches!(err, LoginConfigError::DuplicateContext(name) if name == "Client"));
    }

    #[test]
    fn test_values_kept_verbatim_without_properties() {
        let config = JaasFileParser::new()
            .parse_str(r#"Client { a.B required keyTab="${user.home}/zk.keytab"; };"#)
            .unwrap();
        assert_eq!(
            config.entries("Client").unwrap()[0].option("keyTab"),
            Some("${user.home}/zk.keytab")
        );
    }

    #[test]
    fn test_property_expansion() {
        let props = MapProperties::new().with("user.home", "/home/kafka");
        let parser = JaasFileParser::new().with_properties(Arc::new(props));
        let config = parser
            .parse_str(r#"Client { a.B required keyTab="${user.home}${/}zk.keytab"; };"#)
            .unwrap();
        let expected = format!("/home/kafka{}zk.keytab", std::path::MAIN_SEPARATOR);
        assert_eq!(
            config.entries("Client").unwrap()[0].option("keyTab"),
            Some(expected.as_str())
        );
    }

    #[test]
    fn test_unresolved_property() {
        let parser = JaasFileParser::new().with_properties(Arc::new(MapProperties::new()));
        let err = parser
            .parse_str(r#"Client { a.B required keyTab="${missing.prop}"; };"#)
            .unwrap_err();
        assert!(matches!(err, LoginConfigError::UnresolvedProperty(key) if key == "missing.prop"));
    }

    #[test]
    fn test_unterminated_reference_kept() {
        let props = MapProperties::new();
        assert_eq!(expand_properties("a${b", &props).unwrap(), "a${b");
    }

    #[test]
    fn test_unquoted_paths_and_wildcards() {
        let config = JaasFileParser::new()
            .parse_str(
                "zk/Client {\n  a.B required keyTab=/etc/kafka/zk.keytab principal=*;\n};",
            )
            .unwrap();
        let entries = config.entries("zk/Client").unwrap();
        assert_eq!(entries[0].option("keyTab"), Some("/etc/kafka/zk.keytab"));
        assert_eq!(entries[0].option("principal"), Some("*"));
    }

    #[test]
    fn test_comment_ends_word() {
        let config = JaasFileParser::new()
            .parse_str(
                "Client {\n  a.B required keyTab=/etc/zk.keytab// trailing\n  debug=true/* inline */;\n};",
            )
            .unwrap();
        let entry = &config.entries("Client").unwrap()[0];
        assert_eq!(entry.option("keyTab"), Some("/etc/zk.keytab"));
        assert_eq!(entry.option("debug"), Some("true"));
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JaasFileParser::new()
            .parse(&dir.path().join("absent.conf"))
            .unwrap_err();
        assert!(matches!(err, LoginConfigError::Io(_)));
    }
}
