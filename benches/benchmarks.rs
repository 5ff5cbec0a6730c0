criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        evaluating_seven_card_hand,
        shuffling_a_deck,
        computing_three_way_side_pots,
}

fn evaluating_seven_card_hand(c: &mut criterion::Criterion) {
    let permutation = pokerhouse::rng::shuffle("bench-seed", "bench-client", 1);
    let deck = pokerhouse::cards::Deck::from_permutation(&permutation);
    let cards: Vec<pokerhouse::cards::Card> = (0..7)
        .scan(deck, |deck, _| deck.draw())
        .collect();
    let mut hand = pokerhouse::cards::Hand::empty();
    for &card in &cards {
        hand.add(card);
    }
    c.bench_function("evaluate a 7-card hand", |b| {
        b.iter(|| pokerhouse::cards::best_hand(&hand))
    });
}

fn shuffling_a_deck(c: &mut criterion::Criterion) {
    c.bench_function("shuffle a 52-card deck from a server seed", |b| {
        b.iter(|| pokerhouse::rng::shuffle("bench-seed", "bench-client", 1))
    });
}

fn computing_three_way_side_pots(c: &mut criterion::Criterion) {
    use pokerhouse::sidepot::Contribution;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    let contributions = vec![
        Contribution { player_id: Uuid::new_v4(), total_bet: dec!(50), is_all_in: true, is_folded: false },
        Contribution { player_id: Uuid::new_v4(), total_bet: dec!(150), is_all_in: true, is_folded: false },
        Contribution { player_id: Uuid::new_v4(), total_bet: dec!(300), is_all_in: false, is_folded: false },
    ];
    c.bench_function("compute side pots for a 3-way all-in", |b| {
        b.iter(|| pokerhouse::sidepot::compute_side_pots(&contributions))
    });
}
