use fastrand::Rng;

/// Order crossover (OX): keeps a random slice of `p1` in place and fills the
/// rest with the remaining cities in the order they appear in `p2`.
pub fn order_crossover(p1: &[usize], p2: &[usize], rng: &mut Rng) -> Vec<usize> {
    let n = p1.len();
    if n < 2 {
        return p1.to_vec();
    }

    let (mut a, mut b) = (rng.usize(0..n), rng.usize(0..n));
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }

    let mut child = vec![0usize; n];
    let mut used = vec![false; n];
    for i in a..=b {
        child[i] = p1[i];
        used[p1[i]] = true;
    }

    let mut pos = (b + 1) % n;
    let mut p2i = (b + 1) % n;
    for _ in 0..(n - (b - a + 1)) {
        while used[p2[p2i]] {
            p2i = (p2i + 1) % n;
        }
        child[pos] = p2[p2i];
        used[p2[p2i]] = true;
        pos = (pos + 1) % n;
        p2i = (p2i + 1) % n;
    }
    child
}
