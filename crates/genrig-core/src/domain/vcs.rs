//! Version-control commands issued while priming a sandbox.

/// A `git` invocation, either a single bare subcommand or several
/// subcommand/argument-string pairs run in order.
///
/// ```
/// use genrig_core::domain::GitCommand;
///
/// let init = GitCommand::bare("init");
/// assert_eq!(init.argvs(), vec![vec!["init".to_string()]]);
///
/// let staged = GitCommand::each([("add", "one.rb two.rb"), ("rm", "bad.cxx")]);
/// assert_eq!(staged.argvs().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    Bare(String),
    Each(Vec<(String, String)>),
}

impl GitCommand {
    pub fn bare(command: impl Into<String>) -> Self {
        Self::Bare(command.into())
    }

    pub fn each<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Each(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Argument vectors to pass to `git`, one per process to spawn.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        match self {
            Self::Bare(command) => vec![split_args(command)],
            Self::Each(pairs) => pairs
                .iter()
                .map(|(sub, args)| {
                    let mut argv = vec![sub.clone()];
                    argv.extend(split_args(args));
                    argv
                })
                .collect(),
        }
    }
}

/// Name and email written to the sandboxed global git config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "Dr Nic Williams".into(),
            email: "drnic@starkandwayne.com".into(),
        }
    }
}

impl GitIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// `git config --global user.{name,email} ...`
    pub fn config_command(&self) -> GitCommand {
        GitCommand::Each(vec![
            (
                "config".into(),
                format!("--global user.name {}", quote_arg(&self.name)),
            ),
            (
                "config".into(),
                format!("--global user.email {}", quote_arg(&self.email)),
            ),
        ])
    }
}

/// Single-quote `value` so [`split_args`] yields it back as one argument.
pub fn quote_arg(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Split an argument string the way a POSIX shell would for plain words,
/// single quotes, double quotes and backslash escapes. No expansion happens.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(e @ ('"' | '\\' | '$' | '`')) => current.push(e),
                            Some(e) => {
                                current.push('\\');
                                current.push(e);
                            }
                            None => current.push('\\'),
                        },
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(e) = chars.next() {
                    current.push(e);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_words() {
        assert_eq!(split_args("add  one.rb\ttwo.rb "), vec!["add", "one.rb", "two.rb"]);
    }

    #[test]
    fn single_quotes_group_words() {
        assert_eq!(
            split_args("--global user.name 'Dr Nic Williams'"),
            vec!["--global", "user.name", "Dr Nic Williams"]
        );
    }

    #[test]
    fn double_quotes_honour_escapes() {
        assert_eq!(split_args(r#"-m "say \"hi\"""#), vec!["-m", r#"say "hi""#]);
    }

    #[test]
    fn empty_quotes_make_empty_argument() {
        assert_eq!(split_args("a '' b"), vec!["a", "", "b"]);
    }

    #[test]
    fn quoted_args_split_back_unchanged() {
        let joined = ["it's", "two words"].map(quote_arg).join(" ");
        assert_eq!(split_args(&joined), vec!["it's", "two words"]);
    }

    #[test]
    fn empty_input_has_no_args() {
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn bare_command_is_single_argv() {
        assert_eq!(GitCommand::bare("init").argvs(), vec![vec!["init"]]);
    }

    #[test]
    fn pairs_keep_order() {
        let cmd = GitCommand::each([("add", "onefile.rb"), ("rm", "badfile.cxx")]);
        assert_eq!(
            cmd.argvs(),
            vec![vec!["add", "onefile.rb"], vec!["rm", "badfile.cxx"]]
        );
    }

    #[test]
    fn identity_round_trips_through_quoting() {
        let identity = GitIdentity::new("O'Brien Smith", "ob@example.com");
        let argvs = identity.config_command().argvs();
        assert_eq!(
            argvs,
            vec![
                vec!["config", "--global", "user.name", "O'Brien Smith"],
                vec!["config", "--global", "user.email", "ob@example.com"],
            ]
        );
    }
}
