//! Text output.

use stargazer_model::StarsResponse;

/// Printed when no identifiers are given.
pub const USAGE: &str = "Usage: stargazerctl <git-repo-1> <git-repo-2> ...";

const NAME_WIDTH: usize = 50;

/// Renders the result table without a trailing newline. Failed rows show the
/// error text in the `STARS` column.
pub fn render_table(response: &StarsResponse) -> String {
    let mut lines = Vec::with_capacity(response.repos.len() + 1);
    lines.push(format!("{:<NAME_WIDTH$}{}", "REPO", "STARS"));
    for repo in &response.repos {
        lines.push(format!("{:<NAME_WIDTH$}{}", repo.name, repo.display_value()));
    }
    lines.join("\n")
}
