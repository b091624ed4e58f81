//! Integration tests for stratified k-fold split plans.

#[cfg(test)]
mod tests {
    use metafe::{StratifiedKFold, SplitPlan, Fold};

    /// Three classes with uneven sizes: 30, 18 and 12 rows.
    fn uneven_target() -> Vec<f64> {
        let mut y = vec![0.0; 30];
        y.extend(vec![1.0; 18]);
        y.extend(vec![2.0; 12]);
        y
    }

    #[test]
    fn test_test_sets_partition_index_range() {
        let y = uneven_target();
        let plan = StratifiedKFold::new(6).with_seed(3).split(&y).unwrap();

        assert_eq!(plan.len(), 6);

        let mut seen = vec![false; y.len()];
        for fold in plan.iter() {
            for &idx in &fold.test {
                assert!(!seen[idx], "row {} appears in two test sets", idx);
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "some row never held out");
    }

    #[test]
    fn test_train_is_complement_of_test() {
        let y = uneven_target();
        let plan = StratifiedKFold::new(3).split(&y).unwrap();

        for fold in plan.iter() {
            let mut combined: Vec<usize> = fold.train.iter().chain(fold.test.iter()).copied().collect();
            combined.sort_unstable();
            let expected: Vec<usize> = (0..y.len()).collect();
            assert_eq!(combined, expected);
        }
    }

    #[test]
    fn test_class_proportions_approximately_preserved() {
        let y = uneven_target();
        let plan = StratifiedKFold::new(6).with_seed(0).split(&y).unwrap();

        for fold in plan.iter() {
            let class_0 = fold.test.iter().filter(|&&i| y[i] == 0.0).count();
            let class_1 = fold.test.iter().filter(|&&i| y[i] == 1.0).count();
            let class_2 = fold.test.iter().filter(|&&i| y[i] == 2.0).count();
            assert_eq!(class_0, 5);
            assert_eq!(class_1, 3);
            assert_eq!(class_2, 2);
        }
    }

    #[test]
    fn test_seed_changes_assignment_but_not_shape() {
        let y = uneven_target();
        let a = StratifiedKFold::new(4).with_seed(1).split(&y).unwrap();
        let b = StratifiedKFold::new(4).with_seed(2).split(&y).unwrap();

        assert_ne!(a, b);
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.test.len(), fb.test.len());
        }
    }

    #[test]
    fn test_fold_count_larger_than_smallest_class_is_rejected() {
        let y = uneven_target();
        // Smallest class has 12 members.
        assert!(StratifiedKFold::new(13).split(&y).is_err());
        assert!(StratifiedKFold::new(12).split(&y).is_ok());
    }

    #[test]
    fn test_handcrafted_plan_round_trip() {
        let folds = vec![
            Fold { train: vec![2, 3], test: vec![0, 1] },
            Fold { train: vec![0, 1], test: vec![2, 3] },
        ];
        let plan = SplitPlan::from_folds(folds.clone()).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.folds(), &folds[..]);
    }
}
