use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::BlocksConfig;
use crate::error::RegistryError;
use crate::types::{AIR, BlockId, Face, FaceTextures};

const BUILTIN_BLOCKS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../assets/blocks.toml"
));

#[derive(Clone, Debug, PartialEq)]
pub struct BlockType {
    pub id: BlockId,
    pub identifier: String,
    pub name: String,
    pub solid: bool,
    pub transparent: bool,
    pub textures: FaceTextures,
}

impl BlockType {
    #[inline]
    pub fn texture_for(&self, face: Face) -> u16 {
        self.textures.for_face(face)
    }
}

/// Order-stable table of block types. Index == id, id 0 is air.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_identifier: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Registry loaded from the block table shipped in `assets/blocks.toml`.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml_str(BUILTIN_BLOCKS)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(text)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        if cfg.blocks.is_empty() {
            return Err(RegistryError::Empty);
        }
        if cfg.blocks.len() > usize::from(u16::MAX) + 1 {
            return Err(RegistryError::TooManyBlocks(cfg.blocks.len()));
        }
        let mut reg = BlockRegistry {
            blocks: Vec::with_capacity(cfg.blocks.len()),
            by_identifier: HashMap::with_capacity(cfg.blocks.len()),
        };
        for (i, def) in cfg.blocks.into_iter().enumerate() {
            let id = i as BlockId;
            if reg.by_identifier.contains_key(&def.identifier) {
                return Err(RegistryError::DuplicateIdentifier(def.identifier));
            }
            let ty = BlockType {
                id,
                name: def.name.unwrap_or_else(|| def.identifier.clone()),
                solid: def.solid.unwrap_or(true),
                transparent: def.transparent.unwrap_or(false),
                textures: def.textures.unwrap_or_default().resolve(),
                identifier: def.identifier,
            };
            if id == AIR && (ty.solid || !ty.transparent) {
                return Err(RegistryError::InvalidAir(ty.identifier));
            }
            reg.by_identifier.insert(ty.identifier.clone(), id);
            reg.blocks.push(ty);
        }
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn id_by_identifier(&self, identifier: &str) -> Option<BlockId> {
        self.by_identifier.get(identifier).copied()
    }

    /// Lookup used on generation paths: a missing identifier is logged and
    /// resolves to air.
    pub fn resolve_or_air(&self, identifier: &str) -> BlockId {
        match self.id_by_identifier(identifier) {
            Some(id) => id,
            None => {
                log::error!("could not find block with identifier {identifier}");
                AIR
            }
        }
    }

    pub fn require(&self, identifier: &str) -> Result<BlockId, RegistryError> {
        self.id_by_identifier(identifier)
            .ok_or_else(|| RegistryError::UnknownIdentifier(identifier.to_string()))
    }

    /// Fails on the first identifier the table does not define.
    pub fn validate_identifiers<'a>(
        &self,
        identifiers: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), RegistryError> {
        for ident in identifiers {
            self.require(ident)?;
        }
        Ok(())
    }

    // Unknown ids behave like air.
    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|b| b.solid)
    }

    #[inline]
    pub fn is_transparent(&self, id: BlockId) -> bool {
        self.get(id).is_none_or(|b| b.transparent)
    }
}
