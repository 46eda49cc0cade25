use bevy::{
    prelude::*,
    render::{mesh::Indices, render_asset::RenderAssetUsages, render_resource::PrimitiveTopology},
};
use itertools::iproduct;

#[inline]
fn add_quad(indices: &mut Vec<u32>, a: u32, b: u32, c: u32, d: u32) {
    indices.extend([a, b, c, a, c, d]);
}

fn generate_positions(resolution: u32) -> Vec<[f32; 3]> {
    iproduct!(0..=resolution, 0..=resolution)
        .map(|(y, x)| {
            [
                x as f32 / resolution as f32,
                y as f32 / resolution as f32,
                0.0,
            ]
        })
        .collect()
}

fn generate_indices(resolution: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(6 * (resolution * resolution) as usize);

    for i in iproduct!(0..resolution, 0..resolution).map(|(y, x)| x + y * (resolution + 1)) {
        add_quad(
            &mut indices,
            i,
            i + 1,
            i + resolution + 2,
            i + resolution + 1,
        );
    }

    indices
}

/// The unit square mesh shared by every tile of a terrain.
///
/// It lies in the XY plane, spans `[0,1]²` and is subdivided into
/// `resolution × resolution` cells.
pub struct TileGeometry {
    indices: Vec<u32>,
    positions: Vec<[f32; 3]>,
}

impl TileGeometry {
    pub fn new(resolution: u32) -> Self {
        Self {
            indices: generate_indices(resolution),
            positions: generate_positions(resolution),
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn to_mesh(self) -> Mesh {
        // The vertex stage only reads the position, the normals and uvs keep the mesh
        // compatible with the default mesh pipeline layout.
        let normals = vec![[0.0, 0.0, 1.0]; self.positions.len()];
        let uvs: Vec<[f32; 2]> = self
            .positions
            .iter()
            .map(|&[x, y, _]| [x, y])
            .collect();

        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        )
        .with_inserted_indices(Indices::U32(self.indices))
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_the_unit_square() {
        let geometry = TileGeometry::new(4);

        assert_eq!(geometry.positions().len(), 25);
        assert_eq!(geometry.positions()[0], [0.0, 0.0, 0.0]);
        assert_eq!(geometry.positions()[4], [1.0, 0.0, 0.0]);
        assert_eq!(geometry.positions()[24], [1.0, 1.0, 0.0]);

        for &[x, y, z] in geometry.positions() {
            assert!((0.0..=1.0).contains(&x));
            assert!((0.0..=1.0).contains(&y));
            assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn indices_form_counter_clockwise_quads() {
        let geometry = TileGeometry::new(2);
        let indices = geometry.indices();

        assert_eq!(indices.len(), 2 * 2 * 6);
        assert_eq!(&indices[..6], &[0, 1, 4, 0, 4, 3]);
        assert!(indices.iter().all(|&i| (i as usize) < geometry.positions().len()));

        let positions = geometry.positions();
        for triangle in indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(positions[triangle[i] as usize]));
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn builds_a_mesh() {
        let mesh = TileGeometry::new(8).to_mesh();

        assert_eq!(mesh.count_vertices(), 81);
        assert_eq!(mesh.indices().unwrap().len(), 8 * 8 * 6);
    }
}
