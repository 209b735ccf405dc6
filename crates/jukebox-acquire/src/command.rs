//! Producer command construction and execution.

use tokio::process::Command;
use tracing::info;

use jukebox_config::TITLE_PLACEHOLDER;

use crate::error::{AcquireError, AcquireResult};

/// Render the command template and split the result into an argument vector.
///
/// The title is substituted textually before shell-word splitting, so a title
/// containing quotes or whitespace can change the token structure of the
/// resulting command line. That is the documented contract of the template,
/// not an accident of this function.
///
/// # Errors
///
/// Returns [`AcquireError::CommandParse`] when the rendered line has
/// unbalanced quoting, and [`AcquireError::EmptyCommand`] when it tokenizes
/// to nothing.
pub fn build_command(template: &str, title: &str) -> AcquireResult<Vec<String>> {
    let rendered = template.replace(TITLE_PLACEHOLDER, title);
    let argv = shell_words::split(&rendered).map_err(|source| AcquireError::CommandParse {
        rendered: rendered.clone(),
        source,
    })?;
    if argv.is_empty() {
        return Err(AcquireError::EmptyCommand { rendered });
    }
    Ok(argv)
}

/// Run the producer to completion, inheriting stdio. Succeeds only on exit
/// code zero. No timeout is applied here; the watch phase owns the deadline.
///
/// # Errors
///
/// Returns [`AcquireError::Spawn`] when the process cannot be launched and
/// [`AcquireError::CommandFailed`] with the observed exit code otherwise.
pub async fn run_command(argv: &[String]) -> AcquireResult<()> {
    let Some((program, args)) = argv.split_first() else {
        return Err(AcquireError::EmptyCommand {
            rendered: String::new(),
        });
    };

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| AcquireError::Spawn {
            program: program.clone(),
            source,
        })?;

    if status.success() {
        info!(program = %program, "producer command completed");
        Ok(())
    } else {
        Err(AcquireError::CommandFailed {
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_the_placeholder_exactly_once() {
        let argv = build_command("track-fetch --title {title} --format mp3", "Blue Train")
            .expect("command should build");
        assert_eq!(
            argv,
            vec!["track-fetch", "--title", "Blue", "Train", "--format", "mp3"]
        );
    }

    #[test]
    fn quoted_placeholder_keeps_the_title_as_one_argument() {
        let argv =
            build_command("track-fetch -S \"{title}\"", "So What").expect("command should build");
        assert_eq!(argv, vec!["track-fetch", "-S", "So What"]);
    }

    #[test]
    fn titles_may_change_the_token_structure() {
        // Substitute-then-tokenize is the contract: quotes inside the title
        // are interpreted by the splitter.
        let argv = build_command("fetch {title}", "a 'b c'").expect("command should build");
        assert_eq!(argv, vec!["fetch", "a", "b c"]);
    }

    #[test]
    fn unbalanced_quotes_are_a_parse_error() {
        let err = build_command("fetch {title}", "don't").unwrap_err();
        assert!(matches!(err, AcquireError::CommandParse { .. }));
    }

    #[test]
    fn empty_rendered_commands_are_rejected() {
        let err = build_command("{title}", "   ").unwrap_err();
        assert!(matches!(err, AcquireError::EmptyCommand { .. }));
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let argv = vec!["true".to_string()];
        run_command(&argv).await.expect("true should succeed");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_the_code() {
        let argv = vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()];
        let err = run_command(&argv).await.unwrap_err();
        assert!(matches!(err, AcquireError::CommandFailed { code: Some(3) }));
    }

    #[tokio::test]
    async fn unknown_programs_fail_to_spawn() {
        let argv = vec!["jukebox-test-program-that-does-not-exist".to_string()];
        let err = run_command(&argv).await.unwrap_err();
        assert!(matches!(err, AcquireError::Spawn { .. }));
    }
}
