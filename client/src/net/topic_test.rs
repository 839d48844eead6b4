use super::*;

#[test]
fn topics_derive_from_navigable_paths() {
    assert_eq!(Topic::dashboard().as_str(), "/");
    assert_eq!(Topic::jobs().as_str(), "/jobs");
    assert_eq!(Topic::job("build").as_str(), "/jobs/build");
    assert_eq!(Topic::run("build", 12).as_str(), "/jobs/build/12");
}

#[test]
fn topics_are_equal_iff_keys_are_equal() {
    assert_eq!(Topic::job("build"), Topic::job("build"));
    assert_ne!(Topic::job("build"), Topic::job("deploy"));
    assert_ne!(Topic::run("build", 1), Topic::run("build", 2));
    assert_ne!(Topic::jobs(), Topic::dashboard());
}

#[test]
fn log_topic_is_the_run_path_sibling() {
    assert_eq!(Topic::run("build", 3).log().as_str(), "/jobs/build/3/log");
}

#[test]
fn ws_url_follows_page_scheme() {
    let topic = Topic::job("build");
    assert_eq!(ws_url(false, "ci.example.org", &topic), "ws://ci.example.org/jobs/build");
    assert_eq!(ws_url(true, "ci.example.org:8443", &topic), "wss://ci.example.org:8443/jobs/build");
}
