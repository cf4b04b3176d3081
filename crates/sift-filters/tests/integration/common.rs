use sift_core::{FilterEngine, JobDescriptor, JobState, PipelineConfig};

pub const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Status</title><style>p { color: red; }</style></head>
<body>
<p>before</p>
<div id="status" class="panel">
  <h2>Service status</h2>
  <ul>
    <li>api: ok</li>
    <li>db: degraded</li>
    <li>queue: ok</li>
  </ul>
</div>
<p>after</p>
<script>document.write('<div id="status">fake</div>');</script>
</body>
</html>"#;

/// Engine over the built-in units plus whatever rules `config_json` declares.
pub fn engine(config_json: &str) -> (FilterEngine, PipelineConfig) {
    let config = PipelineConfig::from_json(config_json).expect("valid pipeline config");
    let registry = sift_filters::build_registry(config.rules.clone()).expect("valid registry");
    (FilterEngine::new(registry), config)
}

pub fn state_for(url: &str) -> JobState {
    JobState::new(JobDescriptor::for_url(url))
}
