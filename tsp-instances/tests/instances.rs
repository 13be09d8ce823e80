use tsp_instances::{
    nearest_neighbor_route, parse_tsplib, tour_cost, validate_matrix, DistanceMode, Instance,
};

fn example_matrix() -> Vec<Vec<f32>> {
    vec![
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0, 0.0, 4.0, 5.0],
        vec![2.0, 4.0, 0.0, 6.0],
        vec![3.0, 5.0, 6.0, 0.0],
    ]
}

fn make_seed(index: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[0..8].copy_from_slice(&index.to_le_bytes());
    seed
}

#[test]
fn tour_cost_includes_closing_edge() {
    let matrix = example_matrix();
    // 0->1 (1) + 1->3 (5) + 3->2 (6) + 2->0 (2)
    assert_eq!(tour_cost(&[0, 1, 3, 2], &matrix), 14.0);
    assert_eq!(tour_cost(&[0, 1, 2, 3], &matrix), 14.0);
}

#[test]
fn tour_cost_is_rotation_invariant() {
    let matrix = example_matrix();
    let route = [0, 2, 1, 3];
    let cost = tour_cost(&route, &matrix);
    for rotation in 1..route.len() {
        let mut rotated = route.to_vec();
        rotated.rotate_left(rotation);
        assert_eq!(tour_cost(&rotated, &matrix), cost);
    }
}

#[test]
fn tour_cost_is_reversal_invariant() {
    let matrix = example_matrix();
    let route = [0, 2, 1, 3];
    let mut reversed = route.to_vec();
    reversed.reverse();
    assert_eq!(tour_cost(&reversed, &matrix), tour_cost(&route, &matrix));
}

#[test]
fn nearest_neighbor_follows_smallest_edges() {
    // From 0 the nearest is 1, then 2 (4 < 5), then 3.
    assert_eq!(nearest_neighbor_route(&example_matrix()), vec![0, 1, 2, 3]);
}

#[test]
fn nearest_neighbor_breaks_ties_toward_lowest_index() {
    let n = 6;
    let matrix = vec![vec![5.0; n]; n]
        .into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            row[i] = 0.0;
            row
        })
        .collect::<Vec<_>>();
    assert_eq!(nearest_neighbor_route(&matrix), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn validate_matrix_rejects_malformed_input() {
    assert!(validate_matrix(&[]).is_err());
    assert!(validate_matrix(&[vec![0.0, 1.0], vec![1.0, 0.0]]).is_err());

    let mut ragged = example_matrix();
    ragged[2].pop();
    assert!(validate_matrix(&ragged).is_err());

    let mut asymmetric = example_matrix();
    asymmetric[0][1] = 9.0;
    assert!(validate_matrix(&asymmetric).is_err());

    let mut negative = example_matrix();
    negative[1][2] = -1.0;
    negative[2][1] = -1.0;
    assert!(validate_matrix(&negative).is_err());

    let mut nonzero_diagonal = example_matrix();
    nonzero_diagonal[3][3] = 1.0;
    assert!(validate_matrix(&nonzero_diagonal).is_err());

    assert!(validate_matrix(&example_matrix()).is_ok());
}

#[test]
fn from_matrix_computes_baseline() {
    let instance = Instance::from_matrix("example", example_matrix()).unwrap();
    assert_eq!(instance.num_nodes, 4);
    assert_eq!(instance.baseline_route, vec![0, 1, 2, 3]);
    assert_eq!(instance.baseline_cost, 14.0);
}

#[test]
fn verify_route_accepts_valid_permutations_only() {
    let instance = Instance::from_matrix("example", example_matrix()).unwrap();
    assert_eq!(instance.verify_route(&[0, 1, 3, 2]).unwrap(), 14.0);
    assert!(instance.verify_route(&[0, 1, 2]).is_err());
    assert!(instance.verify_route(&[0, 1, 1, 2]).is_err());
    assert!(instance.verify_route(&[0, 1, 2, 4]).is_err());
}

#[test]
fn generate_is_deterministic_per_seed() {
    let a = Instance::generate("a", &make_seed(42), 30, 0).unwrap();
    let b = Instance::generate("b", &make_seed(42), 30, 0).unwrap();
    let c = Instance::generate("c", &make_seed(43), 30, 0).unwrap();
    assert_eq!(a.node_positions, b.node_positions);
    assert_eq!(a.distance_matrix, b.distance_matrix);
    assert_ne!(a.node_positions, c.node_positions);
}

#[test]
fn generate_builds_valid_clustered_instances() {
    let instance = Instance::generate("clustered", &make_seed(7), 50, 4).unwrap();
    assert_eq!(instance.num_nodes, 50);
    assert_eq!(instance.distance_matrix.len(), 50);
    assert!(validate_matrix(&instance.distance_matrix).is_ok());
    assert_eq!(
        instance.baseline_cost,
        tour_cost(&instance.baseline_route, &instance.distance_matrix)
    );
}

#[test]
fn generate_rejects_tiny_sizes() {
    assert!(Instance::generate("tiny", &make_seed(0), 2, 0).is_err());
}

#[test]
fn euclidean_distances_match_coordinates() {
    let coords = vec![(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)];
    let instance = Instance::from_coords("triangle", coords, DistanceMode::Euclid2d).unwrap();
    assert!((instance.distance_matrix[0][1] - 5.0).abs() < 1e-5);
    assert!((instance.distance_matrix[1][2] - 5.0).abs() < 1e-5);
    assert_eq!(instance.distance_matrix[0][2], 8.0);
    assert_eq!(instance.distance_matrix[0][0], 0.0);
}

#[test]
fn geographic_distances_are_symmetric_and_positive() {
    // Degree.minute encoded coordinates of three distinct cities.
    let coords = vec![(38.24, 20.42), (39.57, 26.15), (40.56, 25.32)];
    let instance = Instance::from_coords("geo", coords, DistanceMode::Geographic).unwrap();
    for i in 0..3 {
        assert_eq!(instance.distance_matrix[i][i], 0.0);
        for j in 0..3 {
            assert_eq!(
                instance.distance_matrix[i][j],
                instance.distance_matrix[j][i]
            );
            if i != j {
                assert!(instance.distance_matrix[i][j] > 0.0);
            }
        }
    }
}

#[test]
fn parse_tsplib_reads_coordinate_files() {
    let text = "\
NAME: square4
TYPE: TSP
COMMENT: unit square corners
DIMENSION: 4
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0.0 0.0
2 0.0 1.0
3 1.0 1.0
4 1.0 0.0
EOF
";
    let instance = parse_tsplib(text).unwrap();
    assert_eq!(instance.name, "square4");
    assert_eq!(instance.num_nodes, 4);
    assert_eq!(instance.distance_matrix[0][1], 1.0);
    assert!((instance.distance_matrix[0][2] - 2.0f32.sqrt()).abs() < 1e-5);
    assert_eq!(tour_cost(&[0, 1, 2, 3], &instance.distance_matrix), 4.0);
}

#[test]
fn parse_tsplib_rejects_unsupported_edge_weight_type() {
    let text = "\
NAME: bad
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
NODE_COORD_SECTION
1 0 0
2 0 1
3 1 0
EOF
";
    let err = parse_tsplib(text).unwrap_err().to_string();
    assert!(err.contains("Unsupported edge weight type"), "{}", err);
    assert!(err.contains("EXPLICIT"), "{}", err);
}

#[test]
fn parse_tsplib_rejects_missing_or_mismatched_headers() {
    assert!(parse_tsplib("").is_err());

    let missing_dimension = "\
NAME: x
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 1
3 1 0
EOF
";
    assert!(parse_tsplib(missing_dimension).is_err());

    let mismatched = "\
NAME: x
DIMENSION: 4
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 1
3 1 0
EOF
";
    assert!(parse_tsplib(mismatched).is_err());

    let malformed_line = "\
NAME: x
DIMENSION: 3
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0
2 0 1
3 1 0
EOF
";
    assert!(parse_tsplib(malformed_line).is_err());
}

#[test]
fn instances_round_trip_through_json() {
    let instance = Instance::generate("roundtrip", &make_seed(3), 12, 0).unwrap();
    let json = serde_json::to_string(&instance).unwrap();
    let back: Instance = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, instance.name);
    assert_eq!(back.distance_matrix, instance.distance_matrix);
    assert_eq!(back.baseline_route, instance.baseline_route);
}
