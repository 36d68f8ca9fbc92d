//! Drives several `PresignParty`/`SignParty` instances through a full run by
//! shuttling messages between them directly in-process, with no network or
//! async runtime involved. Exercises both the happy path (presign followed
//! by online-sign, with the resulting signature verified under the joint
//! public key) and the misbehavior scenarios the round-level faults are
//! supposed to catch.

use gg20_presign::paillier::keys::Modulus;
use gg20_presign::paillier::Ciphertext;
use gg20_presign::presign::{
    Outgoing, PresignMessage, Round1Message1, Round4Message,
};
use gg20_presign::save_data::{centralized_keygen, LocalPresignData, LocalSaveData};
use gg20_presign::sign::{Round1Message as SignRound1Message, SignParty};
use gg20_presign::{CurveParams, Error, Parameters, PartyIdx, PresignParty};

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

fn build_params(n: usize, threshold: usize) -> Vec<Parameters> {
    let party_ids: Vec<String> = (0..n).map(|i| format!("party-{i}")).collect();
    (0..n)
        .map(|i| Parameters {
            party_ids: party_ids.clone(),
            own_idx: PartyIdx::from_usize(i),
            threshold,
            curve: CurveParams::secp256k1(),
        })
        .collect()
}

fn new_parties(
    params: Vec<Parameters>,
    save_datas: Vec<LocalSaveData>,
    rng: &mut ChaCha20Rng,
) -> Vec<PresignParty> {
    params
        .into_iter()
        .zip(save_datas)
        .map(|(p, sd)| PresignParty::new(p, sd, rng).expect("valid parameters"))
        .collect()
}

/// Fans out one tick's outgoing messages (broadcast to every other party,
/// direct to its addressee) and folds them into each recipient.
fn deliver(parties: &mut [PresignParty], outgoing: Vec<Vec<Outgoing>>) -> Result<(), Error> {
    let n = parties.len();
    let mut inbox: Vec<Vec<(PartyIdx, PresignMessage)>> = (0..n).map(|_| Vec::new()).collect();
    for (sender, msgs) in outgoing.into_iter().enumerate() {
        for out in msgs {
            match out {
                Outgoing::Broadcast(m) => {
                    for receiver in 0..n {
                        if receiver != sender {
                            inbox[receiver].push((PartyIdx::from_usize(sender), m.clone()));
                        }
                    }
                }
                Outgoing::Direct(to, m) => inbox[to.as_usize()].push((PartyIdx::from_usize(sender), m)),
            }
        }
    }
    for (i, msgs) in inbox.into_iter().enumerate() {
        for (from, m) in msgs {
            parties[i].receive(from, m)?;
        }
    }
    Ok(())
}

/// Runs every party's `PresignParty` to completion, lock-step: deliver
/// whatever is outstanding, advance every party whose current round has
/// heard from every peer, repeat. Scenarios here never leave one honest
/// party stuck behind another, so a generous fixed tick budget is enough to
/// catch a real non-convergence as a panic instead of a hang.
fn run_presign(
    mut parties: Vec<PresignParty>,
    rng: &mut ChaCha20Rng,
) -> Result<Vec<LocalPresignData>, Error> {
    let n = parties.len();
    let mut outgoing: Vec<Vec<Outgoing>> = parties.iter().map(|p| p.start(rng)).collect();
    let mut finished: Vec<Option<LocalPresignData>> = vec![None; n];

    for _tick in 0..16 {
        deliver(&mut parties, outgoing)?;

        outgoing = vec![Vec::new(); n];
        for i in 0..n {
            if finished[i].is_some() || !parties[i].is_complete() {
                continue;
            }
            let (out, done) = parties[i].advance(rng)?;
            outgoing[i] = out;
            finished[i] = done;
        }

        if finished.iter().all(Option::is_some) {
            return Ok(finished.into_iter().map(|d| d.unwrap()).collect());
        }
    }
    panic!("presign loopback did not converge within the tick budget");
}

fn sign_with(presigns: Vec<LocalPresignData>, message: gg20_presign::curve::Scalar) -> gg20_presign::curve::RecoverableSignature {
    let n = presigns.len();
    let mut parties: Vec<SignParty> = presigns
        .into_iter()
        .enumerate()
        .map(|(i, data)| SignParty::new(PartyIdx::from_usize(i), n, data, message))
        .collect();

    let shares: Vec<SignRound1Message> = parties.iter().map(|p| p.start()).collect();
    for (i, party) in parties.iter_mut().enumerate() {
        for (j, share) in shares.iter().enumerate() {
            if i != j {
                party.receive(PartyIdx::from_usize(j), *share).expect("well-formed share");
            }
        }
    }

    let mut signatures = Vec::new();
    for party in parties {
        assert!(party.is_complete());
        signatures.push(party.finalize().expect("aggregate verifies under the joint public key"));
    }
    let first = signatures[0];
    for sig in &signatures[1..] {
        assert_eq!(sig.r.to_bytes(), first.r.to_bytes());
        assert_eq!(sig.s.to_bytes(), first.s.to_bytes());
    }
    first
}

/// E1: a full run at the smallest nontrivial scale (3 parties, threshold 1)
/// converges, every party ends up holding the same `R`/`{S_j}`, and the
/// resulting online-sign aggregate verifies under the joint public key.
#[test]
fn happy_path_small() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let n = 3;
    let threshold = 1;
    let save_datas = centralized_keygen(n, threshold, &mut rng);
    let public_key = save_datas[0].public_key;
    let params = build_params(n, threshold);
    let parties = new_parties(params, save_datas, &mut rng);

    let presigns = run_presign(parties, &mut rng).expect("every party is honest");
    assert_eq!(presigns.len(), n);

    let first = &presigns[0];
    for data in &presigns[1..] {
        assert_eq!(data.big_r, first.big_r);
        assert_eq!(data.big_s_j, first.big_s_j);
        assert_eq!(data.public_key, public_key);
    }

    let message = gg20_presign::curve::Scalar::random(&mut rng);
    let signature = sign_with(presigns, message);

    use k256::ecdsa::signature::hazmat::PrehashVerifier;
    use k256::ecdsa::VerifyingKey;
    let (k256_sig, _) = signature.to_backend();
    let vkey = VerifyingKey::from_affine(public_key.to_affine()).unwrap();
    vkey.verify_prehash(&message.to_bytes(), &k256_sig).unwrap();
}

/// E2: the same happy path at a larger party count, to exercise the
/// rayon-fanned per-peer loops across more than a handful of peers.
#[test]
fn happy_path_larger_group() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let n = 7;
    let threshold = 4;
    let save_datas = centralized_keygen(n, threshold, &mut rng);
    let public_key = save_datas[0].public_key;
    let params = build_params(n, threshold);
    let parties = new_parties(params, save_datas, &mut rng);

    let presigns = run_presign(parties, &mut rng).expect("every party is honest");
    let first = &presigns[0];
    for data in &presigns[1..] {
        assert_eq!(data.big_r, first.big_r);
        assert_eq!(data.big_s_j, first.big_s_j);
        assert_eq!(data.public_key, public_key);
    }

    let message = gg20_presign::curve::Scalar::random(&mut rng);
    sign_with(presigns, message);
}

/// E3: party 0 hands party 1 a range proof that was built for a different
/// ciphertext than the one actually attached to the message. Party 1's own
/// round-1 verification (using its own aux params, as the verifier) must
/// reject it by name.
#[test]
fn malformed_range_proof_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let n = 3;
    let threshold = 1;
    let save_datas = centralized_keygen(n, threshold, &mut rng);
    let params = build_params(n, threshold);
    let mut parties = new_parties(params, save_datas.clone(), &mut rng);

    let outgoing: Vec<Vec<Outgoing>> = parties.iter().map(|p| p.start(&mut rng)).collect();

    let original = outgoing[0]
        .iter()
        .find_map(|out| match out {
            Outgoing::Direct(to, PresignMessage::Round1Direct(msg)) if to.as_usize() == 1 => {
                Some(msg.clone())
            }
            _ => None,
        })
        .expect("party 0 sends party 1 a round-1 direct message");

    // Keep the original range proof but swap in a ciphertext encrypting a
    // different value: the proof's statement no longer matches it.
    let sender_pk = &save_datas[0].paillier_pks[0];
    let different_value = gg20_presign::curve::Scalar::random(&mut rng);
    let padded_value = Modulus::from_be_slice(&{
        let mut padded = [0u8; 256];
        padded[224..].copy_from_slice(&different_value.to_bytes());
        padded
    });
    let (bad_c_a, _) = Ciphertext::encrypt(sender_pk, &padded_value, &mut rng);
    let corrupted = Round1Message1 {
        c_a: bad_c_a,
        range_proof: original.range_proof,
    };

    let err = parties[1]
        .receive(PartyIdx::from_usize(0), PresignMessage::Round1Direct(corrupted))
        .expect_err("a range proof built for a different ciphertext must not verify");

    match err {
        Error::TheirFault { round, culprit, .. } => {
            assert_eq!(round, 1);
            assert_eq!(culprit, PartyIdx::from_usize(0));
        }
        other => panic!("expected a named-culprit round-1 failure, got {other:?}"),
    }
}

/// E4: party 0 reveals a different `Γ_0` in round 4 than it committed to in
/// round 1. Round 5's opening check must catch the mismatch.
#[test]
fn commitment_mismatch_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let n = 3;
    let threshold = 1;
    let save_datas = centralized_keygen(n, threshold, &mut rng);
    let params = build_params(n, threshold);
    let mut parties = new_parties(params, save_datas, &mut rng);

    // Rounds 1 through 3 proceed honestly.
    let mut outgoing: Vec<Vec<Outgoing>> = parties.iter().map(|p| p.start(&mut rng)).collect();
    for _ in 0..3 {
        deliver(&mut parties, outgoing).expect("rounds 1-3 are honest");
        outgoing = parties
            .iter_mut()
            .map(|p| p.advance(&mut rng).expect("rounds 1-3 are honest").0)
            .collect();
    }
    // `outgoing` now holds every party's round-4 broadcast (the opening of
    // round 1's commitment to Γ_i).
    let corrupted_gamma = gg20_presign::curve::Point::mul_by_generator(&gg20_presign::curve::Scalar::random(&mut rng));
    for out in &mut outgoing[0] {
        if let Outgoing::Broadcast(PresignMessage::Round4Broadcast(msg)) = out {
            *msg = Round4Message {
                decommitment: msg.decommitment,
                gamma_i: corrupted_gamma,
            };
        }
    }

    deliver(&mut parties, outgoing).expect("message delivery itself does not fail");

    // Party 1's round 4 -> round 5 transition is where the opening is
    // checked against round 1's commitment.
    let err = parties[1]
        .advance(&mut rng)
        .expect_err("a different Γ_0 must not open round 1's commitment");

    match err {
        Error::TheirFault { round, culprit, .. } => {
            assert_eq!(round, 5);
            assert_eq!(culprit, PartyIdx::from_usize(0));
        }
        other => panic!("expected a round-5 commitment mismatch, got {other:?}"),
    }
}

/// E5: one party's secret share (and its matching public commitment) is
/// swapped for an unrelated value before presign starts, so every party
/// genuinely computes `Π S_j != Y` and broadcasts a round-7 disclosure.
/// Every disclosure is internally consistent with whatever share its author
/// actually holds, though, so a wrong key share alone gives `identify`
/// nothing to pin on any one party — the reconstruction in
/// `round7::identify` rebuilds each party's `g^{sigma_j}` from its own
/// disclosed values, and a share swap shifts that rebuild and the disclosure
/// together. To isolate a single culprit we additionally tamper with the
/// corrupted party's round-7 broadcast itself (flipping its disclosed
/// `g^{sigma_i}`), reproducing the literal scenario `identify` is built to
/// catch: a disclosure that doesn't match what its own `EcddhProof` and the
/// other parties' reconstruction say it should be.
#[test]
fn corrupted_secret_share_triggers_type7_abort() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let n = 4;
    let threshold = 1;
    let mut save_datas = centralized_keygen(n, threshold, &mut rng);

    let corrupted_idx = 2;
    let bad_share = gg20_presign::curve::Scalar::random(&mut rng);
    let bad_public = gg20_presign::curve::Point::mul_by_generator(&bad_share);
    for sd in &mut save_datas {
        sd.public_shares[corrupted_idx] = bad_public;
    }
    save_datas[corrupted_idx].secret_share = secrecy::SecretBox::new(Box::new(bad_share));

    let params = build_params(n, threshold);
    let mut parties = new_parties(params, save_datas, &mut rng);

    // Rounds 1 through 6 proceed honestly; the wrong share makes every
    // party's round-7 check fail, so `outgoing` after this loop holds every
    // party's round-7 disclosure.
    let mut outgoing: Vec<Vec<Outgoing>> = parties.iter().map(|p| p.start(&mut rng)).collect();
    for _ in 0..6 {
        deliver(&mut parties, outgoing).expect("rounds 1-6 are honest");
        outgoing = parties
            .iter_mut()
            .map(|p| p.advance(&mut rng).expect("rounds 1-6 are honest").0)
            .collect();
    }

    for out in &mut outgoing[corrupted_idx] {
        if let Outgoing::Broadcast(PresignMessage::Round7Broadcast(msg)) = out {
            msg.g_sigma_i = msg.g_sigma_i + gg20_presign::curve::Point::generator();
        }
    }

    deliver(&mut parties, outgoing).expect("message delivery itself does not fail");

    let err = parties[0]
        .advance(&mut rng)
        .expect_err("a wrong reconstructed secret plus a tampered disclosure must abort");

    match err {
        Error::ConsistencyAbortT7 { round, culprits } => {
            assert_eq!(round, 7);
            assert_eq!(
                culprits,
                vec![PartyIdx::from_usize(corrupted_idx)],
                "only the party whose disclosure was tampered should be named"
            );
        }
        other => panic!("expected a type-7 consistency abort, got {other:?}"),
    }
}

/// E6: a run configured with more threshold than the party count can
/// support must be rejected up front, before any message is sent.
#[test]
fn threshold_deficit_is_rejected_up_front() {
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let n = 3;
    let save_datas = centralized_keygen(n, 1, &mut rng);

    // `n` parties can carry at most threshold `n - 1`; ask for `n` instead.
    let mut params = build_params(n, n);
    let bad_params = params.remove(0);
    let bad_save_data = save_datas.into_iter().next().unwrap();

    let err = PresignParty::new(bad_params, bad_save_data, &mut rng)
        .expect_err("threshold must leave room for at least one more signer");

    match err {
        Error::MyFault { fault: gg20_presign::error::MyFault::ParameterError { threshold, num_parties }, .. } => {
            assert_eq!(threshold, n);
            assert_eq!(num_parties, n);
        }
        other => panic!("expected a parameter error, got {other:?}"),
    }
}
