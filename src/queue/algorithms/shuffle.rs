use crate::queue::{connect, Link, Queue};
use rand::Rng;
use std::ptr::NonNull;

impl Queue {
    /// Shuffle the queue into a uniformly random order, using the thread-local
    /// random number generator.
    ///
    /// See [`Queue::shuffle_with`].
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Shuffle the queue into a uniformly random order with the Fisher–Yates
    /// algorithm, drawing from `rng`.
    ///
    /// The nodes are exchanged by relinking; the payloads are never moved.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(*n*) memory for
    /// a temporary index of the nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
    /// queue.shuffle_with(&mut StdRng::seed_from_u64(7));
    ///
    /// let mut values: Vec<&str> = queue.iter().collect();
    /// values.sort();
    /// assert_eq!(values, ["a", "b", "c", "d"]);
    /// ```
    pub fn shuffle_with<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() || self.is_singular() {
            return;
        }
        let ghost = self.ghost();
        let mut nodes = Vec::new();
        let mut link = self.head();
        while link != ghost {
            nodes.push(link);
            // SAFETY: `link` is a non-ghost node of the queue.
            link = unsafe { link.as_ref().next };
        }
        tracing::trace!(len = nodes.len(), "shuffle");
        for i in (1..nodes.len()).rev() {
            let j = rng.random_range(0..=i);
            if i != j {
                // SAFETY: `nodes[i]` and `nodes[j]` are distinct nodes of the queue.
                unsafe { exchange(nodes[j], nodes[i]) };
                nodes.swap(i, j);
            }
        }
    }
}

/// Exchange the positions of two distinct non-ghost nodes `a` and `b` of
/// the same cycle.
unsafe fn exchange(a: NonNull<Link>, b: NonNull<Link>) {
    let (a_prev, a_next) = (a.as_ref().prev, a.as_ref().next);
    let (b_prev, b_next) = (b.as_ref().prev, b.as_ref().next);
    if a_next == b {
        connect(a_prev, b);
        connect(b, a);
        connect(a, b_next);
    } else if b_next == a {
        connect(b_prev, a);
        connect(a, b);
        connect(b, a_next);
    } else {
        connect(a_prev, b);
        connect(b, a_next);
        connect(b_prev, a);
        connect(a, b_next);
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::tests::assert_well_formed;
    use crate::Queue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::iter::FromIterator;

    #[test]
    fn test_exchange() {
        fn test_case(input: &[&str], i: usize, j: usize, expected: &[&str]) {
            let queue = Queue::from_iter(input);
            let nodes: Vec<_> = {
                let mut nodes = Vec::new();
                let mut link = queue.head();
                while link != queue.ghost() {
                    nodes.push(link);
                    link = unsafe { link.as_ref().next };
                }
                nodes
            };
            unsafe { super::exchange(nodes[i], nodes[j]) };
            assert_well_formed(&queue);
            assert_eq!(queue.iter().collect::<Vec<_>>(), expected);
        }
        test_case(&["a", "b"], 0, 1, &["b", "a"]);
        test_case(&["a", "b"], 1, 0, &["b", "a"]);
        test_case(&["a", "b", "c"], 0, 2, &["c", "b", "a"]);
        test_case(&["a", "b", "c", "d"], 1, 2, &["a", "c", "b", "d"]);
        test_case(&["a", "b", "c", "d"], 3, 0, &["d", "b", "c", "a"]);
        test_case(&["a", "b", "c", "d", "e"], 3, 1, &["a", "d", "c", "b", "e"]);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let input: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut queue = Queue::from_iter(&input);
        for _ in 0..20 {
            queue.shuffle_with(&mut rng);
            assert_well_formed(&queue);
            let mut values: Vec<&str> = queue.iter().collect();
            values.sort_unstable();
            let mut expected: Vec<&str> = input.iter().map(String::as_str).collect();
            expected.sort_unstable();
            assert_eq!(values, expected);
        }

        let mut queue = Queue::from_iter(["only"]);
        queue.shuffle();
        assert!(queue.iter().eq(["only"]));
        let mut queue = Queue::new();
        queue.shuffle();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_shuffle_uniform() {
        // 4! permutations, chi-square with 23 degrees of freedom.
        const TRIALS: usize = 48_000;
        const PERMUTATIONS: usize = 24;
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut queue = Queue::from_iter(["1", "2", "3", "4"]);
        for _ in 0..TRIALS {
            queue.shuffle_with(&mut rng);
            *counts.entry(queue.iter().collect()).or_default() += 1;
        }
        assert_eq!(counts.len(), PERMUTATIONS);

        let expected = (TRIALS / PERMUTATIONS) as f64;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // p = 0.0001 for 23 degrees of freedom is about 56.
        assert!(chi_square < 56.0, "chi-square = {}", chi_square);
    }
}
