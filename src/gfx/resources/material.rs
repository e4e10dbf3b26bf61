//! Phong material definitions
//!
//! Materials are plain values kept in a [`MaterialLibrary`] and looked up by
//! tag. Selecting one copies its values into the per-draw uniform.

/// Surface response to the scene lights
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMaterial {
    pub tag: String,
    pub ambient_color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub shininess: f32,
}

impl Default for ObjectMaterial {
    fn default() -> Self {
        Self {
            tag: "default".to_string(),
            ambient_color: [1.0, 1.0, 1.0],
            ambient_strength: 0.2,
            diffuse_color: [0.8, 0.8, 0.8],
            specular_color: [0.2, 0.2, 0.2],
            shininess: 8.0,
        }
    }
}

impl ObjectMaterial {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    /// Builder pattern: Set ambient color and its strength
    pub fn with_ambient(mut self, color: [f32; 3], strength: f32) -> Self {
        self.ambient_color = color;
        self.ambient_strength = strength;
        self
    }

    /// Builder pattern: Set diffuse color
    pub fn with_diffuse(mut self, color: [f32; 3]) -> Self {
        self.diffuse_color = color;
        self
    }

    /// Builder pattern: Set specular color
    pub fn with_specular(mut self, color: [f32; 3]) -> Self {
        self.specular_color = color;
        self
    }

    /// Builder pattern: Set specular exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }
}

fn grey(v: f32) -> [f32; 3] {
    [v, v, v]
}

fn halved(c: [f32; 3]) -> [f32; 3] {
    [c[0] / 2.0, c[1] / 2.0, c[2] / 2.0]
}

/// Ordered collection of materials with tag lookup
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: Vec<ObjectMaterial>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: ObjectMaterial) {
        self.materials.push(material);
    }

    /// First material registered under `tag`
    pub fn find(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn materials(&self) -> &[ObjectMaterial] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// The ten materials available to the clock scene
pub fn define_object_materials() -> MaterialLibrary {
    let mut library = MaterialLibrary::new();

    library.add_material(
        ObjectMaterial::new("gold")
            .with_ambient([0.2, 0.2, 0.1], 0.8)
            .with_diffuse([0.3, 0.3, 0.2])
            .with_specular([0.6, 0.5, 0.4])
            .with_shininess(22.0),
    );
    library.add_material(
        ObjectMaterial::new("cement")
            .with_ambient(grey(0.2), 0.2)
            .with_diffuse(grey(0.5))
            .with_specular(grey(0.4))
            .with_shininess(0.5),
    );
    library.add_material(
        ObjectMaterial::new("wood")
            .with_ambient([0.4, 0.3, 0.1], 0.2)
            .with_diffuse([0.3, 0.2, 0.1])
            .with_specular(grey(0.1))
            .with_shininess(0.3),
    );
    library.add_material(
        ObjectMaterial::new("tile")
            .with_ambient([0.2, 0.3, 0.4], 0.3)
            .with_diffuse([0.3, 0.2, 0.1])
            .with_specular([0.4, 0.5, 0.6])
            .with_shininess(25.0),
    );
    library.add_material(
        ObjectMaterial::new("glass")
            .with_ambient(grey(0.4), 0.3)
            .with_diffuse(grey(0.3))
            .with_specular(grey(0.6))
            .with_shininess(85.0),
    );
    library.add_material(
        ObjectMaterial::new("clay")
            .with_ambient([0.2, 0.2, 0.3], 0.3)
            .with_diffuse([0.4, 0.4, 0.5])
            .with_specular([0.2, 0.2, 0.4])
            .with_shininess(0.5),
    );

    // Softer pastel set: quarter ambient strength, half diffuse and specular
    library.add_material(
        ObjectMaterial::new("pink")
            .with_ambient([0.6, 0.3, 0.5], 0.3 / 4.0)
            .with_diffuse(halved([0.9, 0.5, 0.7]))
            .with_specular(halved([1.0, 0.8, 0.9]))
            .with_shininess(16.0),
    );
    library.add_material(
        ObjectMaterial::new("blue")
            .with_ambient([0.15, 0.15, 0.5], 0.4 / 4.0)
            .with_diffuse(halved([0.5, 0.5, 0.9]))
            .with_specular(halved([0.7, 0.7, 1.0]))
            .with_shininess(32.0),
    );
    library.add_material(
        ObjectMaterial::new("brown")
            .with_ambient([0.4, 0.2, 0.15], 0.2 / 4.0)
            .with_diffuse(halved([0.6, 0.4, 0.3]))
            .with_specular(halved([0.7, 0.5, 0.4]))
            .with_shininess(8.0),
    );
    library.add_material(
        ObjectMaterial::new("red")
            .with_ambient([0.5, 0.15, 0.15], 0.4 / 4.0)
            .with_diffuse(halved([0.9, 0.3, 0.3]))
            .with_specular(halved([1.0, 0.6, 0.6]))
            .with_shininess(32.0),
    );

    library
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_materials_are_defined_in_order() {
        let library = define_object_materials();
        let tags: Vec<&str> = library.materials().iter().map(|m| m.tag.as_str()).collect();
        assert_eq!(
            tags,
            ["gold", "cement", "wood", "tile", "glass", "clay", "pink", "blue", "brown", "red"]
        );
    }

    #[test]
    fn test_find_glass() {
        let library = define_object_materials();
        let glass = library.find("glass").unwrap();
        assert_eq!(glass.ambient_color, [0.4, 0.4, 0.4]);
        assert_eq!(glass.shininess, 85.0);
        assert!(library.find("marble").is_none());
    }

    #[test]
    fn test_pastel_materials_are_scaled() {
        let library = define_object_materials();
        let pink = library.find("pink").unwrap();
        assert_relative_eq!(pink.ambient_strength, 0.075);
        assert_relative_eq!(pink.diffuse_color[0], 0.45);
        assert_relative_eq!(pink.specular_color[1], 0.4);
    }

    #[test]
    fn test_first_match_wins() {
        let mut library = MaterialLibrary::new();
        library.add_material(ObjectMaterial::new("dup").with_shininess(1.0));
        library.add_material(ObjectMaterial::new("dup").with_shininess(2.0));
        assert_eq!(library.find("dup").unwrap().shininess, 1.0);
    }
}
