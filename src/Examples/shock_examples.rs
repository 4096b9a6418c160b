pub fn shock_examples(shocktask: usize) {
    //
    match shocktask {
        0 => {
            // EXPERIMENT PLANNING: dilute methane oxidation in argon
            use crate::Kinetics::mixture::Mixture;
            use crate::ShockTube::plan::plan_experiment;
            let mix = Mixture::parse("CH4: 0.05, O2: 0.10, AR: 0.85").unwrap();
            let plan = plan_experiment(&mix, 295.0, 1500.0, 2.0e5).unwrap();
            println!("driven gas: {}", mix);
            println!("gamma = {:.4}, MW = {:.3} kg/kmol", plan.gamma, plan.MW);
            println!("Ms = {:.4}, shock speed W = {:.1} m/s", plan.Ms, plan.W);
            println!("fill pressure P1 = {:.1} Pa", plan.P1);
            println!("T2 = {:.1} K, P2 = {:.1} Pa, U2 = {:.1} m/s", plan.T2, plan.P2, plan.U2);
            println!("T5 = {:.1} K, P5 = {:.1} Pa", plan.T5, plan.P5);
        }
        1 => {
            // DRIVER PRESSURE for a helium driver over a range of shock strengths
            use crate::Kinetics::mixture::Mixture;
            use crate::ShockTube::driver::solve_driver_pressure;
            use crate::ShockTube::state::ShockConditions;
            let ar = Mixture::parse("AR").unwrap();
            for ms in [1.8, 2.2, 2.6, 3.0] {
                let sc = ShockConditions::from_mach(&ar, 295.0, 1.3e4, ms).unwrap();
                let p4 =
                    solve_driver_pressure(sc.P2, sc.U2, 4.0026, 5.0 / 3.0, 295.0, 1.0).unwrap();
                println!(
                    "Ms = {:.1}: P2 = {:.3e} Pa, U2 = {:.1} m/s, P4 = {:.3e} Pa",
                    ms, sc.P2, sc.U2, p4
                );
            }
        }
        2 => {
            // FULL TASK FILE PIPELINE from the built-in template
            use crate::ShockTube::task_parser_shock::{PlanTask, SHOCK_PLAN_TEMPLATE};
            let task = PlanTask::from_str_task(SHOCK_PLAN_TEMPLATE).unwrap();
            let (conditions, p4) = task.run().unwrap();
            println!("planned experiment: {:#?}", conditions);
            if let Some(p4) = p4 {
                println!("required driver pressure P4 = {:.3e} Pa", p4);
            }
        }
        _ => {
            println!("no such shock example");
        }
    }
}
