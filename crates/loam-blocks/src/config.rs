use serde::Deserialize;

use crate::types::FaceTextures;

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub identifier: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub transparent: Option<bool>,
    #[serde(default)]
    pub textures: Option<TexturesDef>,
}

// Texture indices: `all` is the base, `side` covers the four lateral faces,
// and per-face keys override both.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TexturesDef {
    #[serde(default)]
    pub all: Option<u16>,
    #[serde(default)]
    pub side: Option<u16>,
    #[serde(default)]
    pub top: Option<u16>,
    #[serde(default)]
    pub bottom: Option<u16>,
    #[serde(default)]
    pub back: Option<u16>,
    #[serde(default)]
    pub front: Option<u16>,
    #[serde(default)]
    pub left: Option<u16>,
    #[serde(default)]
    pub right: Option<u16>,
}

impl TexturesDef {
    pub fn resolve(&self) -> FaceTextures {
        let all = self.all.unwrap_or(0);
        let side = self.side.unwrap_or(all);
        FaceTextures {
            back: self.back.unwrap_or(side),
            front: self.front.unwrap_or(side),
            top: self.top.unwrap_or(all),
            bottom: self.bottom.unwrap_or(all),
            left: self.left.unwrap_or(side),
            right: self.right.unwrap_or(side),
        }
    }
}
