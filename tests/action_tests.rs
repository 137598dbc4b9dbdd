#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn action() -> Command {
        let mut cmd = Command::cargo_bin("kodegen_release_action").expect("binary built");
        cmd.env_clear();
        cmd
    }

    #[test]
    fn test_missing_token_fails() {
        action()
            .env("GITHUB_REPOSITORY", "cyrup-ai/kodegen")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Input required and not supplied: token"));
    }

    #[test]
    fn test_missing_token_annotated_in_workflow() {
        action()
            .env("GITHUB_ACTIONS", "true")
            .assert()
            .failure()
            .stdout(predicate::str::contains("::error::Release failed: Input required"));
    }

    #[test]
    fn test_invalid_boolean_input_fails() {
        action()
            .env("INPUT_TOKEN", "secret")
            .env("INPUT_REPO-URL", "cyrup-ai/kodegen")
            .env("INPUT_SKIP-GITHUB-RELEASE", "yes")
            .assert()
            .failure()
            .stderr(predicate::str::contains("skip-github-release"));
    }

    #[test]
    fn test_invalid_repository_fails() {
        action()
            .args(["--token", "secret", "--repo-url", "kodegen"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid repository 'kodegen'"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_tags_written_to_output_file() {
        let server = MockServer::start().await;
        let body = ":robot: release\n---\n\n## [1.4.0](https://github.com/cyrup-ai/kodegen/compare/v1.3.0...v1.4.0) (2024-05-01)\n\n* tags\n\n---\nfooter";

        Mock::given(method("GET"))
            .and(path("/repos/cyrup-ai/kodegen/pulls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "number": 30,
                "title": "chore(main): release 1.4.0",
                "body": body,
                "merged_at": "2024-05-01T00:00:00Z",
                "merge_commit_sha": "4b825dc642cb6eb9a060e54bf8d69288fbee4904",
                "labels": [{ "name": "autorelease: pending" }],
                "head": { "ref": "release-please--branches--main" },
                "base": { "ref": "main" }
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/cyrup-ai/kodegen/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "v1.3.0", "commit": { "sha": "abc" } }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/cyrup-ai/kodegen/git/refs"))
            .and(body_json(json!({
                "ref": "refs/tags/v1.4.0",
                "sha": "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "ref": "refs/tags/v1.4.0",
                "object": { "sha": "4b825dc642cb6eb9a060e54bf8d69288fbee4904" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let output_file = dir.path().join("github_output");
        let uri = server.uri();

        let output_path = output_file.clone();
        tokio::task::spawn_blocking(move || {
            action()
                .env("INPUT_TOKEN", "secret")
                .env("GITHUB_OUTPUT", &output_path)
                .args([
                    "--repo-url",
                    "cyrup-ai/kodegen",
                    "--release-type",
                    "rust",
                    "--target-branch",
                    "main",
                    "--github-api-url",
                    &uri,
                    "--skip-github-release",
                    "true",
                    "--skip-github-pull-request",
                    "true",
                ])
                .assert()
                .success();
        })
        .await
        .expect("action ran");

        let written = std::fs::read_to_string(&output_file).expect("outputs written");
        let lines: Vec<&str> = written.lines().collect();
        let value = |key: &str| {
            lines
                .iter()
                .position(|l| l.starts_with(&format!("{}<<", key)))
                .map(|i| lines[i + 1])
        };

        assert_eq!(value("releases_created"), Some("true"));
        assert_eq!(value("tag_name"), Some("v1.4.0"));
        assert_eq!(value("major"), Some("1"));
        assert_eq!(value("prNumber"), Some("30"));
        assert_eq!(value("paths_released"), Some(r#"["."]"#));
    }
}
