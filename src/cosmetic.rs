//! Randomized passes that break up the grid look of the assembled mesh

use crate::geometry::{Triangle, Vertex3D};
use rand::Rng;

/// Small signed offset in roughly `[-factor / 4, factor / 4]`, peaked at zero
pub fn nudge<R: Rng + ?Sized>(rng: &mut R, factor: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * (rng.gen::<f32>() - 0.5) * factor
}

/// Flip the shared diagonal of about half of the quads.
///
/// `triangles` must hold quads as consecutive pairs `(tr, tl, bl)`,
/// `(tr, bl, br)`; a flipped pair becomes `(tr, tl, br)`, `(tl, bl, br)`.
/// A trailing unpaired triangle is left alone.
pub fn rotate_diagonals<R: Rng + ?Sized>(triangles: &mut [Triangle], rng: &mut R) {
    for pair in triangles.chunks_exact_mut(2) {
        if rng.gen_bool(0.5) {
            pair[0].indices[2] = pair[1].indices[2];
            pair[1].indices[0] = pair[0].indices[1];
        }
    }
}

/// Displace every point, more horizontally than vertically
pub fn jitter<R: Rng + ?Sized>(points: &mut [Vertex3D], rng: &mut R, horizontal: f32, vertical: f32) {
    for point in points {
        point.x += nudge(rng, horizontal);
        point.y += nudge(rng, horizontal);
        point.z += nudge(rng, vertical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masks::Color;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quad() -> Vec<Triangle> {
        // Corners: 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right
        let color = Color::new(0.0, 1.0, 0.0);
        vec![Triangle::new(1, 0, 2, color), Triangle::new(1, 2, 3, color)]
    }

    #[test]
    fn test_nudge_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let n = nudge(&mut rng, 0.75);
            assert!(n.abs() <= 0.75 / 4.0);
        }
    }

    #[test]
    fn test_rotation_swaps_diagonal() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut seen_flip = false;
        let mut seen_keep = false;

        for _ in 0..64 {
            let mut triangles = quad();
            rotate_diagonals(&mut triangles, &mut rng);
            match (triangles[0].indices, triangles[1].indices) {
                ([1, 0, 2], [1, 2, 3]) => seen_keep = true,
                ([1, 0, 3], [0, 2, 3]) => seen_flip = true,
                other => panic!("Unexpected tessellation {:?}", other),
            }
        }

        assert!(seen_flip && seen_keep);
    }

    #[test]
    fn test_jitter_is_seeded() {
        let base = vec![Vertex3D::new(1.0, -1.0, 2.0); 8];

        let mut a = base.clone();
        let mut b = base.clone();
        jitter(&mut a, &mut ChaCha8Rng::seed_from_u64(3), 0.75, 0.5);
        jitter(&mut b, &mut ChaCha8Rng::seed_from_u64(3), 0.75, 0.5);

        assert_eq!(a, b);
        assert_ne!(a, base);
        for (moved, original) in a.iter().zip(&base) {
            assert!((moved.x - original.x).abs() <= 0.75 / 4.0);
            assert!((moved.z - original.z).abs() <= 0.5 / 4.0);
        }
    }
}
