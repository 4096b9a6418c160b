pub fn kin_examples(kintask: usize) {
    //
    match kintask {
        0 => {
            // MIXTURES AND MOLAR MASSES
            use crate::Kinetics::mixture::Mixture;
            use crate::Kinetics::molmass::{molar_mass, parse_formula};
            let mix = Mixture::parse("CH4: 0.04, O2: 0.08, AR: 0.88").unwrap();
            println!("mixture: {}", mix);
            println!("mole fractions: {:?}", mix.mole_fractions());
            println!("mean molar mass: {:.3} kg/kmol", mix.mean_molar_mass().unwrap());

            let (mw, composition) = molar_mass("CH4").unwrap();
            println!("CH4: {:?}, {} g/mol", composition, mw);
            let atomic_composition = parse_formula("Ca(NO3)2").unwrap();
            println!("{:?}", atomic_composition);
        }
        1 => {
            // BATCH REACTOR with a model exothermic mechanism
            use crate::Kinetics::mechanism::{ElemReact, ReactionMech};
            use crate::Kinetics::mixture::Mixture;
            use crate::Kinetics::reactor::{BatchReactor, IdtMethod};
            let mech = ReactionMech::new(vec![ElemReact {
                eq: "A=>B".to_string(),
                A: 5e5,
                n: 0.0,
                E: 80000.0,
                Q: 150000.0,
            }])
            .unwrap();
            mech.pretty_print();
            let mixture = Mixture::parse("A").unwrap();
            let mut reactor = BatchReactor::new(mech, mixture, 1100.0, 2.0e5, 5e-3).unwrap();
            reactor.set_properties(0.5, 800.0).unwrap();
            reactor.solve().unwrap();
            let tau = reactor
                .ignition_delay_time(None, IdtMethod::Inflection)
                .unwrap();
            println!("ignition delay time: {:.2} us", tau * 1e6);
            println!("top species: {:?}", reactor.top_species(None, None).unwrap());
            reactor.plot_in_terminal().unwrap();
        }
        2 => {
            // PARAMETER STUDY and the resulting IDT plot
            use crate::Figures::idt_plot::IdtPlot;
            use crate::Kinetics::mechanism::ElemReact;
            use crate::Kinetics::pool::{PoolSettings, SimulationPool};
            use crate::Kinetics::reactor::IdtMethod;
            let mechs = vec![(
                "model".to_string(),
                vec![ElemReact {
                    eq: "A=>B".to_string(),
                    A: 5e5,
                    n: 0.0,
                    E: 80000.0,
                    Q: 150000.0,
                }],
            )];
            let temperatures = vec![1050.0, 1100.0, 1150.0, 1200.0];
            let settings = PoolSettings {
                t_end: 5e-3,
                method: IdtMethod::Inflection,
                species: None,
                properties: Some((0.5, 800.0)),
            };
            let pool = SimulationPool::parameter_study(
                &mechs,
                &temperatures,
                &[2.0e5],
                &["A".to_string()],
                &settings,
            )
            .unwrap();
            pool.pretty_print();

            let (t, tau) = pool.series("model", 2.0e5, "A");
            let mut plot = IdtPlot::new();
            plot.add_sim("model", &t, &tau).unwrap();
            plot.pretty_print();
            let _ = plot.render_terminal();
        }
        _ => {
            println!("no such kinetics example");
        }
    }
}
