//! Roundtrip Test - Build, Finish, Decode
//!
//! Skenario end-to-end lewat public API: entity dibangun bottom-up, buffer
//! di-finish, lalu dibaca kembali (dan diverifikasi) dari bytes mentah.
//!
//! Usage:
//!   RUST_LOG=flatgraph=trace cargo test --test roundtrip_test -- --nocapture

use flatgraph::core::wire::{read_scalar_at, UOffsetT};
use flatgraph::{
    root, verified_root, verify, Builder, BuilderConfig, ByteOrder, CorruptBufferError, DType,
    FlatArray, FlatArrayArgs, FlatConfiguration, FlatConfigurationArgs, FlatDropRequest,
    FlatDropRequestArgs, FlatError, FlatGraph, FlatGraphArgs, FlatInferenceRequest,
    FlatInferenceRequestArgs, FlatResponse, FlatResponseArgs, FlatVariable, FlatVariableArgs,
    FrameIteration, FrameIterationArgs, IntPair, IntPairArgs, Offset, OpType, ProfilingMode,
    Result, Table, UiHardwareState, UiHardwareStateArgs, UiInfoType, UiStaticInfoRecord,
    UiStaticInfoRecordArgs, UpdaterState, UpdaterStateArgs, VarType, VerifierOptions,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flatgraph=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn build_array<'a>(b: &mut Builder, shape: &[i64], data: &[f32]) -> Result<Offset<FlatArray<'a>>> {
    let raw: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    let shape = b.create_vector(shape)?;
    let buffer = b.create_byte_vector(&raw)?;
    FlatArray::create(
        b,
        &FlatArrayArgs {
            shape: Some(shape),
            buffer: Some(buffer),
            dtype: DType::FLOAT,
            byte_order: ByteOrder::LE,
        },
    )
}

/// Inference request lengkap: 2 variable dengan ndarray + configuration
fn build_request() -> Result<Vec<u8>> {
    let mut b = Builder::new();

    let mut vars = Vec::new();
    for (i, name) in ["input", "labels"].iter().enumerate() {
        let id = IntPair::create(&mut b, &IntPairArgs { first: i as i32 + 1, second: 0 })?;
        let name = b.create_string(name)?;
        let arr = build_array(&mut b, &[2], &[0.5, i as f32])?;
        let deps = b.create_vector_of_strings(&["init"])?;
        vars.push(FlatVariable::create(
            &mut b,
            &FlatVariableArgs {
                id: Some(id),
                name: Some(name),
                dtype: DType::FLOAT,
                ndarray: Some(arr),
                variable_type: VarType::PLACEHOLDER,
                control_deps: Some(deps),
                ..Default::default()
            },
        )?);
    }
    let variables = b.create_vector_of_offsets(&vars)?;
    let configuration = FlatConfiguration::create(
        &mut b,
        &FlatConfigurationArgs {
            id: 77,
            profiling_mode: ProfilingMode::NAN_PANIC,
            timestats: true,
            ..Default::default()
        },
    )?;
    let req = FlatInferenceRequest::create(
        &mut b,
        &FlatInferenceRequestArgs {
            id: 1001,
            variables: Some(variables),
            configuration: Some(configuration),
        },
    )?;
    b.finish(req)?;
    b.into_finished()
}

/// Baca semua field request; error apa pun diteruskan
///
/// Hasilnya checksum kasar (wrapping), supaya nilai korup tidak overflow.
fn read_request(bytes: &[u8]) -> Result<u64> {
    let req = root::<FlatInferenceRequest>(bytes)?;
    let mut seen = req.id()? as u64;
    let mut add = |v: u64| seen = seen.wrapping_add(v);
    for var in req.variables()? {
        let var = var?;
        add(var.name()?.map_or(0, str::len) as u64);
        if let Some(id) = var.id()? {
            add(id.first()? as u64);
        }
        if let Some(arr) = var.ndarray()? {
            add(arr.shape()?.to_vec()?.len() as u64);
            add(arr.buffer_bytes()?.len() as u64);
            add(arr.dtype()?.code() as u64);
        }
        for dep in var.control_deps()? {
            add(dep?.len() as u64);
        }
    }
    if let Some(cfg) = req.configuration()? {
        add(cfg.id()? as u64);
        add(cfg.timestats()? as u64);
    }
    Ok(seen)
}

#[test]
fn test_frame_iteration_scenario() {
    init_tracing();

    let mut b = Builder::new();
    let frame = b.create_string("while_loop_1").unwrap();
    let fi = FrameIteration::create(
        &mut b,
        &FrameIterationArgs {
            frame: Some(frame),
            iteration: 3,
        },
    )
    .unwrap();
    let bytes = b.finish(fi).unwrap();

    let decoded = verified_root::<FrameIteration>(bytes, &VerifierOptions::default()).unwrap();
    assert_eq!(decoded.frame().unwrap(), Some("while_loop_1"));
    assert_eq!(decoded.iteration().unwrap(), 3);
}

#[test]
fn test_updater_state_scenario() {
    init_tracing();

    let mut b = Builder::new();
    let param_name = b.create_string("W1").unwrap();
    let keys = b.create_vector_of_strings(&["m", "v"]).unwrap();
    let m = build_array(&mut b, &[2], &[0.1, 0.2]).unwrap();
    let v = build_array(&mut b, &[3], &[1.0, 2.0, 3.0]).unwrap();
    let values = b.create_vector_of_offsets(&[m, v]).unwrap();
    let state = UpdaterState::create(
        &mut b,
        &UpdaterStateArgs {
            param_name: Some(param_name),
            updater_state_keys: Some(keys),
            updater_state_values: Some(values),
        },
    )
    .unwrap();
    let bytes = b.finish(state).unwrap();

    let decoded = verified_root::<UpdaterState>(bytes, &VerifierOptions::default()).unwrap();
    assert_eq!(decoded.param_name().unwrap(), Some("W1"));
    assert_eq!(decoded.updater_state_keys_len().unwrap(), 2);
    assert_eq!(decoded.updater_state_values_len().unwrap(), 2);

    // Urutan insert dipertahankan, tidak terbalik
    let keys: Vec<&str> = decoded.updater_state_keys().unwrap().to_vec().unwrap();
    assert_eq!(keys, ["m", "v"]);

    let (key, value) = decoded.entry(0).unwrap();
    assert_eq!(key, "m");
    assert_eq!(value.shape().unwrap().to_vec().unwrap(), vec![2]);
    let (key, value) = decoded.entry(1).unwrap();
    assert_eq!(key, "v");
    assert_eq!(value.shape().unwrap().to_vec().unwrap(), vec![3]);
    assert_eq!(value.buffer_bytes().unwrap().len(), 12);
    assert_eq!(&value.buffer_bytes().unwrap()[4..8], &2.0f32.to_le_bytes());
}

#[test]
fn test_graph_with_updater_state() {
    init_tracing();

    let mut b = Builder::new();
    let mut states = Vec::new();
    for (param, dims) in [("W1", 2i64), ("b1", 3)] {
        let param_name = b.create_string(param).unwrap();
        let keys = b.create_vector_of_strings(&["m", "v"]).unwrap();
        let data = vec![0.5f32; dims as usize];
        let m = build_array(&mut b, &[dims], &data).unwrap();
        let v = build_array(&mut b, &[dims], &data).unwrap();
        let values = b.create_vector_of_offsets(&[m, v]).unwrap();
        states.push(
            UpdaterState::create(
                &mut b,
                &UpdaterStateArgs {
                    param_name: Some(param_name),
                    updater_state_keys: Some(keys),
                    updater_state_values: Some(values),
                },
            )
            .unwrap(),
        );
    }
    let updater_state = b.create_vector_of_offsets(&states).unwrap();
    let configuration = FlatConfiguration::create(
        &mut b,
        &FlatConfigurationArgs {
            id: 5,
            ..Default::default()
        },
    )
    .unwrap();
    let loss_variables = b.create_vector_of_strings(&["loss"]).unwrap();
    let graph = FlatGraph::create(
        &mut b,
        &FlatGraphArgs {
            id: 9,
            configuration: Some(configuration),
            loss_variables: Some(loss_variables),
            updater_state: Some(updater_state),
            ..Default::default()
        },
    )
    .unwrap();
    let bytes = b.finish(graph).unwrap();

    let decoded = verified_root::<FlatGraph>(bytes, &VerifierOptions::default()).unwrap();
    assert_eq!(decoded.id().unwrap(), 9);
    assert_eq!(decoded.configuration().unwrap().unwrap().id().unwrap(), 5);
    assert_eq!(decoded.loss_variables().unwrap().to_vec().unwrap(), vec!["loss"]);
    assert_eq!(decoded.variables_len().unwrap(), 0);
    assert_eq!(decoded.training_config().unwrap(), None);

    assert_eq!(decoded.updater_state_len().unwrap(), 2);
    let bias = decoded.updater_state().unwrap().get(1).unwrap();
    assert_eq!(bias.param_name().unwrap(), Some("b1"));
    let (key, value) = bias.entry(1).unwrap();
    assert_eq!(key, "v");
    assert_eq!(value.shape().unwrap().to_vec().unwrap(), vec![3]);
    assert_eq!(value.buffer_bytes().unwrap().len(), 12);
}

#[test]
fn test_flat_response_default_elision() {
    init_tracing();

    // Status = 0 (default): slot dielide, vtable hanya header
    let mut b = Builder::new();
    let resp = FlatResponse::create(&mut b, &FlatResponseArgs { status: 0 }).unwrap();
    let elided = b.finish(resp).unwrap().to_vec();

    let decoded = root::<FlatResponse>(&elided).unwrap();
    assert_eq!(decoded.status().unwrap(), 0);
    assert_eq!(decoded.table().field_offset(FlatResponse::VT_STATUS).unwrap(), 0);
    assert_eq!(decoded.table().vtable().unwrap().num_bytes(), 4);

    // Tidak ada sinyal "pernah di-set": bytes identik dengan table kosong
    let mut b = Builder::new();
    b.start_table(FlatResponse::FIELD_COUNT).unwrap();
    let empty: Offset<Table> = b.end_table().unwrap();
    assert_eq!(b.finish(empty).unwrap(), &elided[..]);

    // force_defaults: slot ditulis, nilai yang dibaca tetap sama
    let mut b = Builder::with_config(BuilderConfig {
        force_defaults: true,
        ..BuilderConfig::default()
    });
    let resp = FlatResponse::create(&mut b, &FlatResponseArgs { status: 0 }).unwrap();
    let forced = b.finish(resp).unwrap();
    let decoded = root::<FlatResponse>(forced).unwrap();
    assert_eq!(decoded.status().unwrap(), 0);
    assert_ne!(decoded.table().field_offset(FlatResponse::VT_STATUS).unwrap(), 0);
    assert!(forced.len() > elided.len());
}

#[test]
fn test_full_request_roundtrip() {
    init_tracing();

    let bytes = build_request().unwrap();
    let req = verified_root::<FlatInferenceRequest>(&bytes, &VerifierOptions::default()).unwrap();
    assert_eq!(req.id().unwrap(), 1001);

    let vars = req.variables().unwrap();
    assert_eq!(vars.len(), 2);
    let labels = vars.get(1).unwrap();
    assert_eq!(labels.name().unwrap(), Some("labels"));
    assert_eq!(labels.id().unwrap().unwrap().first().unwrap(), 2);
    assert_eq!(labels.variable_type().unwrap(), VarType::PLACEHOLDER);
    let arr = labels.ndarray().unwrap().unwrap();
    assert_eq!(arr.dtype().unwrap(), DType::FLOAT);
    assert_eq!(&arr.buffer_bytes().unwrap()[4..], &1.0f32.to_le_bytes());

    let cfg = req.configuration().unwrap().unwrap();
    assert_eq!(cfg.id().unwrap(), 77);
    assert_eq!(cfg.profiling_mode().unwrap(), ProfilingMode::NAN_PANIC);
    assert!(cfg.timestats().unwrap());

    assert!(read_request(&bytes).is_ok());
}

#[test]
fn test_forward_compatibility() {
    init_tracing();

    // Producer lama: FlatVariable hanya punya id dan name
    let mut b = Builder::new();
    let name = b.create_string("legacy").unwrap();
    b.start_table(2).unwrap();
    b.push_slot_offset(FlatVariable::VT_NAME, Some(name)).unwrap();
    let old: Offset<FlatVariable> = b.end_table().unwrap();
    let bytes = b.finish(old).unwrap();

    let var = root::<FlatVariable>(bytes).unwrap();
    assert_eq!(var.table().vtable().unwrap().num_fields(), 2);
    assert_eq!(var.name().unwrap(), Some("legacy"));
    assert!(var.id().unwrap().is_none());
    assert_eq!(var.dtype().unwrap(), DType::INHERIT);
    assert!(var.shape().unwrap().is_empty());
    assert_eq!(var.device().unwrap(), 0);
    assert_eq!(var.variable_type().unwrap(), VarType::VARIABLE);
    assert!(var.control_deps_for_var().unwrap().is_empty());
    verify::<FlatVariable>(bytes, &VerifierOptions::default()).unwrap();

    // Producer baru: slot tambahan di luar yang dikenal reader diabaikan
    let mut b = Builder::new();
    b.start_table(4).unwrap();
    b.push_slot::<i32>(FlatResponse::VT_STATUS, 5, 0).unwrap();
    b.push_slot::<i64>(10, 123, 0).unwrap();
    let newer: Offset<FlatResponse> = b.end_table().unwrap();
    let bytes = b.finish(newer).unwrap();
    assert_eq!(root::<FlatResponse>(bytes).unwrap().status().unwrap(), 5);
    verify::<FlatResponse>(bytes, &VerifierOptions::default()).unwrap();
}

#[test]
fn test_enum_pass_through() {
    init_tracing();

    let mut b = Builder::new();
    let arr = FlatArray::create(
        &mut b,
        &FlatArrayArgs {
            dtype: DType(33),
            byte_order: ByteOrder(7),
            ..Default::default()
        },
    )
    .unwrap();
    let bytes = b.finish(arr).unwrap();

    let decoded = verified_root::<FlatArray>(bytes, &VerifierOptions::default()).unwrap();
    let dtype = decoded.dtype().unwrap();
    assert_eq!(dtype.code(), 33);
    assert_eq!(dtype.variant_name(), None);
    assert_eq!(decoded.byte_order().unwrap(), ByteOrder(7));

    // OpType lewat table generic
    let mut b = Builder::new();
    b.start_table(1).unwrap();
    b.push_slot(4, OpType(99), OpType::TRANSFORM_FLOAT).unwrap();
    let t: Offset<Table> = b.end_table().unwrap();
    let bytes = b.finish(t).unwrap();
    let table = root::<Table>(bytes).unwrap();
    let op = table.get_scalar(4, OpType::TRANSFORM_FLOAT).unwrap();
    assert_eq!(op, OpType(99));
    assert!(!op.is_known());
    assert_eq!(
        table.get_scalar(4, OpType::TRANSFORM_FLOAT).unwrap().code(),
        99
    );
}

#[test]
fn test_monitoring_records() {
    init_tracing();

    let mut b = Builder::new();
    let gpu = b.create_vector::<i64>(&[1024, 2048, 4096]).unwrap();
    let hw = UiHardwareState::create(
        &mut b,
        &UiHardwareStateArgs {
            gpu_memory: Some(gpu),
            host_memory: 1 << 34,
        },
    )
    .unwrap();
    let bytes = b.finish(hw).unwrap();
    let decoded = verified_root::<UiHardwareState>(bytes, &VerifierOptions::default()).unwrap();
    assert_eq!(
        decoded.gpu_memory().unwrap().to_vec().unwrap(),
        vec![1024, 2048, 4096]
    );
    assert_eq!(decoded.host_memory().unwrap(), 1 << 34);

    // Builder yang sama dipakai ulang setelah reset
    b.reset();
    let rec = UiStaticInfoRecord::create(
        &mut b,
        &UiStaticInfoRecordArgs {
            info_type: UiInfoType::SYSTEM_INFO,
        },
    )
    .unwrap();
    let bytes = b.finish(rec).unwrap();
    let decoded = root::<UiStaticInfoRecord>(bytes).unwrap();
    assert_eq!(decoded.info_type().unwrap(), UiInfoType::SYSTEM_INFO);

    b.reset();
    let drop = FlatDropRequest::create(&mut b, &FlatDropRequestArgs { id: -1 }).unwrap();
    let bytes = b.finish(drop).unwrap();
    assert_eq!(root::<FlatDropRequest>(bytes).unwrap().id().unwrap(), -1);
}

#[test]
fn test_vtable_dedup_shrinks_output() {
    init_tracing();

    let build = |dedup: bool| -> (usize, usize) {
        let mut b = Builder::with_config(BuilderConfig {
            dedup_vtables: dedup,
            ..BuilderConfig::default()
        });
        let arrays: Vec<_> = (0..16)
            .map(|i| build_array(&mut b, &[1], &[i as f32]).unwrap())
            .collect();
        let keys: Vec<String> = (0..16).map(|i| format!("k{}", i)).collect();
        let keys = b.create_vector_of_strings(&keys).unwrap();
        let values = b.create_vector_of_offsets(&arrays).unwrap();
        let state = UpdaterState::create(
            &mut b,
            &UpdaterStateArgs {
                updater_state_keys: Some(keys),
                updater_state_values: Some(values),
                ..Default::default()
            },
        )
        .unwrap();
        let len = b.finish(state).unwrap().len();
        (len, b.vtable_count())
    };

    let (shared_len, shared_vtables) = build(true);
    let (plain_len, plain_vtables) = build(false);
    assert!(shared_vtables < plain_vtables);
    assert_eq!(plain_vtables, 17);
    assert!(shared_len < plain_len);
}

#[test]
fn test_truncated_buffer_never_panics() {
    init_tracing();

    let bytes = build_request().unwrap();
    let root_pos = read_scalar_at::<UOffsetT>(&bytes, 0).unwrap() as usize;
    let opts = VerifierOptions::default();

    for cut in 0..bytes.len() {
        let truncated = &bytes[..cut];
        // Error atau sukses parsial, tapi tidak pernah panic
        let _ = read_request(truncated);
        let verdict = verify::<FlatInferenceRequest>(truncated, &opts);
        if cut <= root_pos {
            let err = verdict.unwrap_err();
            assert!(err.is_corrupt(), "cut {} gave {:?}", cut, err);
        }
    }
}

#[test]
fn test_corrupted_bytes_never_panic() {
    init_tracing();

    let bytes = build_request().unwrap();
    let opts = VerifierOptions::default();
    for i in 0..bytes.len() {
        for poison in [0x00u8, 0x7F, 0xFF] {
            let mut corrupt = bytes.clone();
            corrupt[i] = poison;
            let _ = read_request(&corrupt);
            let _ = verify::<FlatInferenceRequest>(&corrupt, &opts);
        }
    }
}

#[test]
fn test_bad_root_offset() {
    init_tracing();

    let mut bytes = build_request().unwrap();
    let len = bytes.len() as u32;
    bytes[..4].copy_from_slice(&len.to_le_bytes());
    assert!(matches!(
        root::<FlatInferenceRequest>(&bytes),
        Err(FlatError::Corrupt(CorruptBufferError::BadOffset { pos: 0 }))
    ));
}

#[test]
fn test_concurrent_readers() {
    init_tracing();

    let bytes = build_request().unwrap();
    let expected = read_request(&bytes).unwrap();

    let shared = bytes.as_slice();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(move || {
                    (0..100)
                        .map(|_| read_request(shared).unwrap())
                        .all(|seen| seen == expected)
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    });
}
