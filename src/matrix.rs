use crate::graph::ParticleGraph;
use crate::traits::{HasBackboneIndex, HasName, HasPosition3D};

/// One particle per row: `[index, name, backbone index, X, Y, Z, offsets...]`.
///
/// Offsets are the signed row distances to each neighbour in ascending order,
/// positive ones written with a leading `+`. Rows of all parts share one index
/// space starting at `start_index`. The coordinate columns are empty strings.
pub fn positions_and_connections<P, B>(
    graphs: &[ParticleGraph<P, B>],
    start_index: usize,
) -> Vec<Vec<String>>
where
    P: HasName + HasBackboneIndex,
{
    rows(graphs, start_index, |_| None)
}

/// Same as [`positions_and_connections`] with the coordinate columns filled in.
pub fn positions_and_connections_placed<P, B>(
    graphs: &[ParticleGraph<P, B>],
    start_index: usize,
) -> Vec<Vec<String>>
where
    P: HasName + HasBackboneIndex + HasPosition3D,
{
    rows(graphs, start_index, |p| p.position_3d())
}

fn rows<P, B, F>(
    graphs: &[ParticleGraph<P, B>],
    start_index: usize,
    position: F,
) -> Vec<Vec<String>>
where
    P: HasName + HasBackboneIndex,
    F: Fn(&P) -> Option<[f64; 3]>,
{
    let mut rows = Vec::new();
    let mut offset = 0;
    for graph in graphs {
        for idx in graph.particles() {
            let particle = graph.particle(idx);
            let mut row = vec![
                (start_index + offset + idx.index()).to_string(),
                particle.name().to_string(),
                particle.backbone_index().to_string(),
            ];
            match position(particle) {
                Some(xyz) => row.extend(xyz.iter().map(|v| v.to_string())),
                None => row.extend(std::iter::repeat(String::new()).take(3)),
            }
            for neighbor in graph.sorted_neighbors(idx) {
                let distance = neighbor.index() as isize - idx.index() as isize;
                row.push(if distance > 0 {
                    format!("+{distance}")
                } else {
                    distance.to_string()
                });
            }
            rows.push(row);
        }
        offset += graph.particle_count();
    }
    rows
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::config::{Anchors, ParseOptions};
    use crate::placement::place_particles;
    use crate::spices::parse_spices;

    fn graphs(s: &str) -> Vec<ParticleGraph> {
        parse_spices(s, &ParseOptions::default()).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn linear_chain() {
        let matrix = positions_and_connections(&graphs("A-B-C"), 1);
        assert_eq!(
            matrix,
            [
                row(&["1", "A", "0", "", "", "", "+1"]),
                row(&["2", "B", "0", "", "", "", "-1", "+1"]),
                row(&["3", "C", "0", "", "", "", "-1"]),
            ]
        );
    }

    #[test]
    fn ring_and_backbone() {
        let matrix = positions_and_connections(&graphs("A[1]'1'-B'2'-C-D-E[1]"), 0);
        assert_eq!(matrix[0], row(&["0", "A", "1", "", "", "", "+1", "+4"]));
        assert_eq!(matrix[4], row(&["4", "E", "0", "", "", "", "-4", "-1"]));
    }

    #[test]
    fn parts_continue_numbering() {
        let matrix = positions_and_connections(&graphs("<A-B><C-D>"), 1);
        assert_eq!(matrix[2], row(&["3", "C", "0", "", "", "", "+1"]));
        assert_eq!(matrix[3], row(&["4", "D", "0", "", "", "", "-1"]));
    }

    #[test]
    fn placed_coordinates() {
        let anchors = Anchors::new(Point3::origin(), Point3::new(2.0, 0.0, 0.0));
        let placed = place_particles(&graphs("A-B(C)")[0], &anchors, 0.5);
        let matrix = positions_and_connections_placed(&[placed], 1);
        assert_eq!(matrix[0], row(&["1", "A", "0", "0", "0", "0", "+1"]));
        assert_eq!(matrix[1], row(&["2", "B", "0", "0.5", "0", "0", "-1", "+1"]));
        assert_eq!(matrix[2], row(&["3", "C", "0", "1", "0", "0", "-1"]));
    }
}
