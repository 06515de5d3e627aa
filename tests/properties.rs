//! Property-based tests for the inference invariants.

use heredity::hypothesis::{hypotheses, GenePartitions, TraitSet, TraitSubsets};
use heredity::posterior::Accumulator;
use heredity::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;

fn name(idx: usize) -> String {
    format!("p{}", idx)
}

/// People `p0..pn`, each either a founder or the child of two distinct
/// earlier people, so the parent graph is always acyclic.
fn people_strategy(max: usize) -> impl Strategy<Value = Vec<Person>> {
    (0..=max)
        .prop_flat_map(|n| {
            proptest::collection::vec(
                (
                    any::<bool>(),
                    any::<Index>(),
                    any::<Index>(),
                    proptest::option::of(any::<bool>()),
                ),
                n,
            )
        })
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (has_parents, mother, father, observed))| {
                    let mut person = Person::new(&name(i));
                    if has_parents && i >= 2 {
                        let mother = mother.index(i);
                        let mut father = father.index(i - 1);
                        if father >= mother {
                            father += 1;
                        }
                        person = person.with_parents(&name(mother), &name(father));
                    }
                    person.has_trait = observed;
                    person
                })
                .collect()
        })
}

fn pedigree(people: Vec<Person>) -> Pedigree {
    let mut population = Population::new();
    population
        .observe(people.into_iter().map(Ok))
        .expect("generated records are unique");
    Pedigree::new(population).expect("generated pedigree is valid")
}

fn params_strategy() -> impl Strategy<Value = ModelParameters> {
    (0.001f64..0.2, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(
        |(mutation, t0, t1, t2)| ModelParameters {
            mutation,
            trait_present: [t0.clamp(0.01, 0.99), t1.clamp(0.01, 0.99), t2.clamp(0.01, 0.99)],
            ..ModelParameters::default()
        },
    )
}

fn genes_strategy(n: usize) -> impl Strategy<Value = Vec<GeneCount>> {
    proptest::collection::vec(prop::sample::select(GeneCount::ALL.to_vec()), n)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn posteriors_are_normalized(people in people_strategy(5), params in params_strategy()) {
        let pedigree = pedigree(people);
        let (posteriors, _) = Inference::new(params)
            .expect("valid parameters")
            .run(&pedigree)
            .expect("inference failed");
        prop_assert_eq!(posteriors.len(), pedigree.len());
        for (name, d) in posteriors.iter() {
            let gene: f64 = d.gene.iter().sum();
            let traits: f64 = d.traits.iter().sum();
            prop_assert!((gene - 1.0).abs() < 1e-9, "{} gene sums to {}", name, gene);
            prop_assert!((traits - 1.0).abs() < 1e-9, "{} trait sums to {}", name, traits);
            prop_assert!(d.gene.iter().chain(d.traits.iter()).all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn observed_traits_are_certain(people in people_strategy(5)) {
        let pedigree = pedigree(people);
        let (posteriors, _) = Inference::default().run(&pedigree).expect("inference failed");
        for person in pedigree.people() {
            if let Some(observed) = person.has_trait {
                let d = posteriors.get(&person.name).expect("missing person");
                prop_assert_eq!(d.has_trait(observed), 1.0);
            }
        }
    }

    #[test]
    fn child_distribution_sums_to_one(
        mutation in 0.0f64..=1.0,
        mother in prop::sample::select(GeneCount::ALL.to_vec()),
        father in prop::sample::select(GeneCount::ALL.to_vec()),
    ) {
        let params = ModelParameters { mutation, ..ModelParameters::default() };
        let distribution = JointEvaluator::new(params)
            .expect("valid parameters")
            .child_gene_distribution(mother, father);
        let total: f64 = distribution.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-12);
        prop_assert!(distribution.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn founders_are_independent(
        (genes, traits) in (0usize..=6).prop_flat_map(|n| {
            (genes_strategy(n), proptest::collection::vec(any::<bool>(), n))
        }),
    ) {
        let people = (0..genes.len()).map(|i| Person::new(&name(i))).collect();
        let pedigree = pedigree(people);
        let hypothesis = Hypothesis {
            genes: genes.clone(),
            traits: TraitSet::from_indices((0..traits.len()).filter(|&i| traits[i])),
        };
        let params = ModelParameters::default();
        let expected: f64 = genes
            .iter()
            .zip(traits.iter())
            .map(|(&copies, &has_trait)| {
                params.gene_prior(copies) * params.trait_likelihood(copies, has_trait)
            })
            .product();
        let joint = JointEvaluator::new(params)
            .expect("valid parameters")
            .joint_probability(&pedigree, &hypothesis);
        prop_assert!((joint - expected).abs() <= 1e-12 * expected.max(1e-300));
    }

    #[test]
    fn enumeration_without_evidence_is_complete(n in 0usize..=5) {
        let evidence = vec![None; n];
        let subsets = TraitSubsets::new(&evidence).expect("small population");
        prop_assert_eq!(subsets.count(), 1usize << n);
        prop_assert_eq!(GenePartitions::new(n).count(), 3usize.pow(n as u32));
    }

    #[test]
    fn marginal_mass_matches_total(people in people_strategy(4)) {
        let pedigree = pedigree(people);
        let evaluator = JointEvaluator::default();
        let mut acc = Accumulator::new(pedigree.len());
        for hypothesis in hypotheses(&pedigree).expect("small population") {
            let p = evaluator.joint_probability(&pedigree, &hypothesis);
            acc.update(&hypothesis, p);
        }
        let total = acc.total();
        prop_assert!(total > 0.0);
        for idx in 0..pedigree.len() {
            prop_assert!((acc.gene_mass(idx).sum() - total).abs() <= 1e-9 * total);
            prop_assert!((acc.trait_mass(idx).sum() - total).abs() <= 1e-9 * total);
        }
    }

    #[test]
    fn parallel_agrees_with_sequential(people in people_strategy(5)) {
        let pedigree = pedigree(people);
        let (sequential, s) = Inference::default().run(&pedigree).expect("inference failed");
        let mut config = InferenceConfig::new();
        config.parallel(true);
        let (parallel, p) = Inference::with_config(ModelParameters::default(), config)
            .expect("valid parameters")
            .run(&pedigree)
            .expect("inference failed");
        prop_assert_eq!(s, p);
        for ((_, x), (_, y)) in sequential.iter().zip(parallel.iter()) {
            for (a, b) in x.gene.iter().chain(x.traits.iter()).zip(y.gene.iter().chain(y.traits.iter())) {
                prop_assert!((a - b).abs() < 1e-12);
            }
        }
    }
}
