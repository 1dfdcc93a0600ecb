use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Scene manifest describing everything the host renderer must load:
/// models, textures, the skybox cube map, shader programs and the HUD font.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Named models: name → mesh file.
    #[serde(default)]
    pub models: BTreeMap<String, ModelDescriptor>,
    /// Named textures: name → image file.
    #[serde(default)]
    pub textures: BTreeMap<String, TextureDescriptor>,
    /// Optional skybox cube map.
    #[serde(default)]
    pub skybox: Option<SkyboxDescriptor>,
    /// Named shader programs.
    #[serde(default)]
    pub shaders: BTreeMap<String, ShaderDescriptor>,
    /// Optional HUD font.
    #[serde(default)]
    pub font: Option<FontDescriptor>,
}

/// A mesh file (e.g. Wavefront OBJ) the host imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    pub path: String,
}

/// Six cube-map faces in GL order: +X, -X, +Y, -Y, +Z, -Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyboxDescriptor {
    pub faces: Vec<String>,
}

/// A vertex/fragment shader pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderDescriptor {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub path: String,
    /// Pixel height to rasterize glyphs at.
    #[serde(default = "default_font_size")]
    pub size: u32,
}

fn default_font_size() -> u32 {
    48
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the manifest for problems serde cannot express.
    /// Returns one readable message per problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if let Some(skybox) = &self.skybox {
            if skybox.faces.len() != 6 {
                errors.push(format!(
                    "skybox needs exactly 6 faces, got {}",
                    skybox.faces.len()
                ));
            }
        }
        for (name, model) in &self.models {
            if model.path.is_empty() {
                errors.push(format!("model '{}' has an empty path", name));
            }
        }
        for (name, texture) in &self.textures {
            if texture.path.is_empty() {
                errors.push(format!("texture '{}' has an empty path", name));
            }
        }
        if let Some(font) = &self.font {
            if font.size == 0 {
                errors.push("font size must be positive".to_string());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The asset set the Goriziana table scene ships with.
    pub fn goriziana_default() -> Self {
        let models = [
            ("ball", "models/ball/ball.obj"),
            ("cube", "models/cube/cube.obj"),
            ("pin", "models/pin/scaledPin.obj"),
            ("table", "models/table/gTable.obj"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), ModelDescriptor { path: path.to_string() }))
        .collect();

        let mut textures = BTreeMap::new();
        textures.insert(
            "floor".to_string(),
            TextureDescriptor { path: "textures/floor.jpg".to_string() },
        );

        let faces = ["right", "left", "top", "bottom", "front", "back"]
            .iter()
            .map(|face| format!("skybox/{}.jpg", face))
            .collect();

        let shaders = [
            ("textured", "shaderTextureCT"),
            ("untextured", "shaderNoTextureCT"),
            ("debug", "shaderDebug"),
            ("skybox", "shaderSkybox"),
        ]
        .into_iter()
        .map(|(name, stem)| {
            (
                name.to_string(),
                ShaderDescriptor {
                    vertex: format!("shaders/{}.vert", stem),
                    fragment: format!("shaders/{}.frag", stem),
                },
            )
        })
        .collect();

        Self {
            models,
            textures,
            skybox: Some(SkyboxDescriptor { faces }),
            shaders,
            font: Some(FontDescriptor {
                path: "font/arial.ttf".to_string(),
                size: default_font_size(),
            }),
        }
    }
}
