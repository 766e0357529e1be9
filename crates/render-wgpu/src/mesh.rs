use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::str::FromStr;

use crate::RenderError;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Static geometry the renderer can draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shape {
    /// Single triangle, three vertices.
    Triangle,
    /// Rectangle from two triangles sharing an edge, four vertices.
    #[default]
    Quad,
}

impl Shape {
    /// Vertices in normalized device coordinates and triangle-list indices.
    pub fn mesh(self) -> (Vec<Vertex>, Vec<u32>) {
        match self {
            Shape::Triangle => {
                let vertices = vec![
                    Vertex { position: [-0.5, -0.5, 0.0] }, // left
                    Vertex { position: [0.5, -0.5, 0.0] },  // right
                    Vertex { position: [0.0, 0.5, 0.0] },   // top
                ];
                (vertices, vec![0, 1, 2])
            }
            Shape::Quad => {
                let vertices = vec![
                    Vertex { position: [0.5, 0.5, 0.0] },   // top right
                    Vertex { position: [0.5, -0.5, 0.0] },  // bottom right
                    Vertex { position: [-0.5, -0.5, 0.0] }, // bottom left
                    Vertex { position: [-0.5, 0.5, 0.0] },  // top left
                ];
                #[rustfmt::skip]
                let indices = vec![
                    0, 1, 3,
                    1, 2, 3,
                ];
                (vertices, indices)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Triangle => "triangle",
            Shape::Quad => "quad",
        }
    }
}

impl FromStr for Shape {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triangle" => Ok(Shape::Triangle),
            "quad" | "rectangle" => Ok(Shape::Quad),
            _ => Err(RenderError::UnknownShape(s.to_string())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles_over_four_vertices() {
        let (vertices, indices) = Shape::Quad.mesh();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 3, 1, 2, 3]);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn triangle_mesh() {
        let (vertices, indices) = Shape::Triangle.mesh();
        assert_eq!(vertices.len(), 3);
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn geometry_lies_in_ndc_plane() {
        for shape in [Shape::Quad, Shape::Triangle] {
            let (vertices, _) = shape.mesh();
            for v in vertices {
                let [x, y, z] = v.position;
                assert!(x.abs() <= 1.0 && y.abs() <= 1.0);
                assert_eq!(z, 0.0);
            }
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        let (vertices, _) = Shape::Quad.mesh();
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&vertices).len(), 48);
    }

    #[test]
    fn shapes_parse() {
        assert_eq!("quad".parse::<Shape>(), Ok(Shape::Quad));
        assert_eq!("Triangle".parse::<Shape>(), Ok(Shape::Triangle));
        assert_eq!("rectangle".parse::<Shape>(), Ok(Shape::Quad));
        assert_eq!(
            "cube".parse::<Shape>(),
            Err(RenderError::UnknownShape("cube".into()))
        );
        assert_eq!(Shape::default(), Shape::Quad);
    }
}
