use anyhow::Context;
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "./assets"]
struct Assets;

pub(crate) const SCORING_CONFIG: &str = "brush_scoring_config.yaml";

pub(crate) fn read(name: &str) -> anyhow::Result<String> {
  let file = Assets::get(name).with_context(|| format!("missing embedded asset {name}"))?;

  String::from_utf8(file.data.into_owned()).with_context(|| format!("embedded asset {name} is not valid UTF-8"))
}
